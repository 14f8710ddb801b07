use crate::page::layout::{render_document, render_notice};
use crate::page::map::{render_map, MAP_HEAD};
use crate::page::{escape_html, PageOptions};
use trackcore::report::SummaryReport;
use trackcore::view::{DashboardView, RecordPage};

/// Renders the full dashboard for one recomputed view.
///
/// `notices` are one-shot messages (load errors, rejected actions) shown at the
/// top of the sidebar.
pub fn render_dashboard(
    view: &DashboardView,
    records: &RecordPage,
    options: &PageOptions,
    notices: &[String],
) -> String {
    let notice_html: String = notices
        .iter()
        .map(|message| render_notice("error", message))
        .collect();

    let sidebar = if view.has_data() {
        format!(
            "{}{}{}",
            render_date_picker(view, options),
            render_hour_buttons(view, options),
            render_data_section(view, records, options)
        )
    } else {
        render_notice("warning", "No location data available")
    };

    let main = match (&view.map, &view.map_error) {
        (Some(scene), _) => match render_map(scene, options.decorated_headers) {
            Ok(html) => html,
            Err(err) => render_notice("error", &format!("Error displaying map: {}", err)),
        },
        (None, Some(message)) => render_notice("warning", message),
        (None, None) => render_notice("warning", "No data available for selected date"),
    };

    let body = format!(
        r#"<div class="shell">
<aside class="sidebar">
{notices}
{sidebar}
</aside>
<main class="main">
{main}
</main>
</div>"#,
        notices = notice_html,
        sidebar = sidebar,
        main = main,
    );

    render_document(&options.title, MAP_HEAD, &body)
}

fn render_date_picker(view: &DashboardView, options: &PageOptions) -> String {
    let (Some(bounds), Some(selected)) = (view.date_bounds, view.selected_date) else {
        return String::new();
    };
    format!(
        r#"<h3>{heading}</h3>
<form method="post" action="/action">
    <input type="hidden" name="action" value="set_date">
    <label>Select Date
        <input type="date" name="date" value="{value}" min="{min}" max="{max}" onchange="this.form.submit()">
    </label>
    <noscript><button class="wide-button" type="submit">Apply</button></noscript>
</form>"#,
        heading = options.heading("📅", "Calendar"),
        value = selected.format("%Y-%m-%d"),
        min = bounds.min.format("%Y-%m-%d"),
        max = bounds.max.format("%Y-%m-%d"),
    )
}

fn render_hour_buttons(view: &DashboardView, options: &PageOptions) -> String {
    if view.hour_buttons.is_empty() {
        return render_notice("warning", "No data available for this date");
    }

    let all_class = if view.all_hours() {
        "wide-button primary"
    } else {
        "wide-button"
    };
    let buttons: String = view
        .hour_buttons
        .iter()
        .map(|button| {
            format!(
                r#"<form method="post" action="/action">
    <input type="hidden" name="action" value="toggle_hour">
    <button class="hour-button{selected}" style="background-color: {color};" type="submit" name="hour" value="{hour}" title="View data for {label} ({count} points)">{label}</button>
</form>"#,
                selected = if button.selected { " selected" } else { "" },
                color = escape_html(&button.color),
                hour = button.hour,
                label = escape_html(&button.label),
                count = button.count,
            )
        })
        .collect();

    format!(
        r#"<h3>{heading}</h3>
<form method="post" action="/action">
    <input type="hidden" name="action" value="clear_hours">
    <button class="{all_class}" type="submit">All Hours</button>
</form>
<div class="hour-buttons">
{buttons}
</div>"#,
        heading = options.heading("🕒", "Hours"),
        all_class = all_class,
        buttons = buttons,
    )
}

fn render_data_section(view: &DashboardView, records: &RecordPage, options: &PageOptions) -> String {
    let selection = match view.selection_label() {
        Some(label) => format!("<h4>Selected Times: {}</h4>", escape_html(&label)),
        None => "<h4>All Data</h4>".to_string(),
    };
    let download = view
        .export_file_name
        .as_ref()
        .map(|name| {
            format!(
                r#"<p><a class="wide-button" href="/export.csv" download="{name}">{label}</a></p>"#,
                name = escape_html(name),
                label = options.heading("📥", "Download as CSV"),
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="data-section">
<h3>{heading}</h3>
<h4>Summary Statistics</h4>
{stats}
{selection}
<h4>Points Distribution by Hour</h4>
{distribution}
{records}
{download}
<form method="post" action="/reload">
    <button class="wide-button" type="submit">Reload data file</button>
</form>
</div>"#,
        heading = options.heading("📊", "Data Analysis"),
        stats = render_stats_table(&view.summary, options),
        selection = selection,
        distribution = render_distribution_table(&view.summary),
        records = render_record_table(records),
        download = download,
    )
}

fn render_stats_table(summary: &SummaryReport, options: &PageOptions) -> String {
    let rows: String = summary
        .metric_rows(options.extended_stats)
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.metric),
                escape_html(&row.value)
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th>Metric</th><th>Value</th></tr></thead><tbody>{}</tbody></table>",
        rows
    )
}

fn render_distribution_table(summary: &SummaryReport) -> String {
    if summary.hour_distribution.is_empty() {
        return render_notice("warning", "N/A");
    }
    let rows: String = summary
        .hour_distribution
        .iter()
        .enumerate()
        .map(|(idx, share)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                idx + 1,
                share.label(),
                share.count,
                share.percentage_label()
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th></th><th>Hour</th><th>Points</th><th>Percentage</th></tr></thead><tbody>{}</tbody></table>",
        rows
    )
}

fn render_record_table(records: &RecordPage) -> String {
    let rows: String = records
        .rows
        .iter()
        .enumerate()
        .map(|(offset, record)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                records.first_row + offset,
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                record.latitude,
                record.longitude,
                escape_html(&record.zip_file)
            )
        })
        .collect();

    let previous = if records.has_previous() {
        format!(r#"<a href="/?page={}">&laquo; Prev</a>"#, records.page - 1)
    } else {
        "<span></span>".to_string()
    };
    let next = if records.has_next() {
        format!(r#"<a href="/?page={}">Next &raquo;</a>"#, records.page + 1)
    } else {
        "<span></span>".to_string()
    };

    format!(
        r#"<div class="records">
<table><thead><tr><th></th><th>timestamp</th><th>latitude</th><th>longitude</th><th>zip_file</th></tr></thead>
<tbody>{rows}</tbody></table>
</div>
<div class="pager">{previous}<span>Page {page} of {page_count} ({total} rows)</span>{next}</div>"#,
        rows = rows,
        previous = previous,
        next = next,
        page = records.page,
        page_count = records.page_count,
        total = records.total,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackcore::dataset::read_dataset;
    use trackcore::filter::FilterState;
    use trackcore::map::{HourColorTable, MapSettings};
    use trackcore::view::{paginate, recompute_view};

    const LOG: &str = "timestamp,latitude,longitude,zip_file\n\
06-01 08:00:00.000000,35.0,129.0,a.zip\n\
06-01 08:05:00.000000,35.001,129.001,<b>.zip\n\
06-01 09:00:00.000000,35.1,129.1,b.zip\n";

    fn view_with(hours: &[u8]) -> DashboardView {
        let dataset = read_dataset(LOG.as_bytes(), "2024").unwrap();
        let mut filter = FilterState::new();
        filter.ensure_date(&dataset);
        for &hour in hours {
            filter.toggle_hour(hour).unwrap();
        }
        recompute_view(&dataset, &filter, &HourColorTable, &MapSettings::default())
    }

    #[test]
    fn dashboard_lists_hours_stats_and_map() {
        let view = view_with(&[]);
        let page = paginate(&view.records, 1, 100);
        let html = render_dashboard(&view, &page, &PageOptions::default(), &[]);

        assert!(html.contains(r#"min="2024-06-01" max="2024-06-01""#));
        assert!(html.contains(r#"name="hour" value="8""#));
        assert!(html.contains(r#"name="hour" value="9""#));
        assert!(!html.contains(r#"name="hour" value="10""#));
        assert!(html.contains("<td>1. Total Coordinates</td><td>3</td>"));
        assert!(html.contains("<td>08:00</td><td>2</td><td>66.7%</td>"));
        assert!(html.contains("&lt;b&gt;.zip"));
        assert!(html.contains(r#"id="map-scene""#));
        assert!(html.contains("<h4>All Data</h4>"));
    }

    #[test]
    fn plain_variant_drops_decorations_and_extended_rows() {
        let view = view_with(&[8]);
        let page = paginate(&view.records, 1, 100);
        let options = PageOptions {
            decorated_headers: false,
            extended_stats: false,
            ..Default::default()
        };
        let html = render_dashboard(&view, &page, &options, &["Rejected".to_string()]);

        assert!(!html.contains("📅"));
        assert!(!html.contains("3. Start Time"));
        assert!(html.contains("Selected Times: 08:00"));
        assert!(html.contains(r#"<div class="notice error">Rejected</div>"#));
        assert!(html.contains(r#"class="hour-button selected""#));
    }

    #[test]
    fn empty_view_shows_placeholder() {
        let view = DashboardView::default();
        let page = paginate(&view.records, 1, 100);
        let html = render_dashboard(&view, &page, &PageOptions::default(), &[]);
        assert!(html.contains("No location data available"));
        assert!(!html.contains(r#"type="date""#));
    }
}
