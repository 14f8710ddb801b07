use crate::config::DashboardConfig;
use crate::page::{render_dashboard, render_login, PageOptions};
use crate::server::forms::{ActionForm, IndexQuery, LoginForm};
use crate::server::session::{session_cookie, SessionStore, SESSION_COOKIE};
use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::json;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use trackcore::auth::{Credentials, GateState, SessionGate};
use trackcore::dataset::{export_csv, DatasetCache, LoadOutcome};
use trackcore::filter::FilterState;
use trackcore::map::{HourColorTable, MapSettings};
use trackcore::telemetry::MetricsRecorder;
use trackcore::view::{dispatch, paginate, recompute_view, DashboardView};
use warp::http::{header, HeaderValue, StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const FORM_LIMIT: u64 = 16 * 1024;

/// Shared, read-mostly service state. Mutable per-user state lives only in
/// the session store.
pub struct AppState {
    pub cache: DatasetCache,
    pub sessions: SessionStore,
    pub gate: SessionGate,
    pub palette: HourColorTable,
    pub map_settings: MapSettings,
    pub page_options: PageOptions,
    pub page_size: usize,
    pub metrics: MetricsRecorder,
}

impl AppState {
    pub fn new(config: &DashboardConfig, credentials: Credentials) -> Self {
        let gate = SessionGate::new(credentials, config.session_ttl_hours);
        Self {
            cache: DatasetCache::new(config.data_path.clone(), config.timestamp_year.clone()),
            sessions: SessionStore::new(gate.ttl()),
            gate,
            palette: HourColorTable::new(),
            map_settings: config.map.clone(),
            page_options: config.page.clone(),
            page_size: config.page_size,
            metrics: MetricsRecorder::new(),
        }
    }

    /// The cached dataset; counts a load failure when this call did the read.
    pub fn dataset(&self) -> Arc<LoadOutcome> {
        let loads_before = self.cache.load_count();
        let outcome = self.cache.get();
        if outcome.error.is_some() && self.cache.load_count() != loads_before {
            self.metrics.record_load_failure();
        }
        outcome
    }

    /// The session's filter if it is logged in at `now`.
    fn authorized_filter(
        &self,
        id: &str,
        outcome: &LoadOutcome,
        now: DateTime<Utc>,
    ) -> Option<FilterState> {
        self.sessions.with_context(id, |ctx| {
            if self.gate.check(&mut ctx.auth, now) == GateState::LoggedOut {
                return None;
            }
            ctx.filter.ensure_date(&outcome.dataset);
            Some(ctx.filter.clone())
        })
    }

    fn view(&self, outcome: &LoadOutcome, filter: &FilterState) -> DashboardView {
        let view = recompute_view(&outcome.dataset, filter, &self.palette, &self.map_settings);
        self.metrics.record_view();
        if view.map_error.is_some() && view.filtered_count > 0 {
            self.metrics.record_map_failure();
        }
        view
    }
}

/// A request bound to a session; issues the cookie when the session is new.
struct Visit {
    id: String,
    issued: bool,
}

impl Visit {
    fn begin(state: &AppState, cookie: Option<String>, now: DateTime<Utc>) -> Self {
        let (id, issued) = state.sessions.resolve(cookie.as_deref(), now);
        Self { id, issued }
    }

    fn finish(self, reply: impl Reply) -> Response {
        let mut response = reply.into_response();
        if self.issued {
            if let Ok(value) = HeaderValue::from_str(&session_cookie(&self.id)) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }
        response
    }
}

fn redirect(path: &'static str) -> Response {
    warp::redirect::see_other(Uri::from_static(path)).into_response()
}

fn handle_index(query: IndexQuery, cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let outcome = state.dataset();

    let Some(filter) = state.authorized_filter(&visit.id, &outcome, now) else {
        return visit.finish(redirect("/login"));
    };
    let mut notices = state
        .sessions
        .with_context(&visit.id, |ctx| ctx.take_notices());
    if let Some(error) = &outcome.error {
        notices.insert(0, error.clone());
    }

    let view = state.view(&outcome, &filter);
    let page = paginate(&view.records, query.page.unwrap_or(1), state.page_size);
    let html = render_dashboard(&view, &page, &state.page_options, &notices);
    visit.finish(warp::reply::html(html))
}

fn handle_login_page(cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let logged_in = state
        .sessions
        .with_context(&visit.id, |ctx| state.gate.check(&mut ctx.auth, now));
    if logged_in == GateState::LoggedIn {
        return visit.finish(redirect("/"));
    }
    visit.finish(warp::reply::html(render_login(&state.page_options, None)))
}

fn handle_login_submit(form: LoginForm, cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let mut visit = Visit::begin(&state, cookie, now);
    let result = state.sessions.with_context(&visit.id, |ctx| {
        state
            .gate
            .submit(&mut ctx.auth, &form.username, &form.password, now)
    });

    match result {
        Ok(()) => {
            visit.id = state.sessions.rotate(&visit.id, now);
            visit.issued = true;
            visit.finish(redirect("/"))
        }
        Err(err) => {
            state.metrics.record_login_failure();
            let page = render_login(&state.page_options, Some(&capitalize(&err.to_string())));
            visit.finish(warp::reply::with_status(
                warp::reply::html(page),
                StatusCode::UNAUTHORIZED,
            ))
        }
    }
}

fn handle_action(form: ActionForm, cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let outcome = state.dataset();

    let authorized = state.sessions.with_context(&visit.id, |ctx| {
        if state.gate.check(&mut ctx.auth, now) == GateState::LoggedOut {
            return false;
        }
        ctx.filter.ensure_date(&outcome.dataset);
        let applied = form
            .parse()
            .and_then(|action| {
                dispatch(&mut ctx.filter, &outcome.dataset, action).map_err(|err| err.to_string())
            });
        if let Err(message) = applied {
            debug!("rejected dashboard action {:?}: {}", form, message);
            ctx.notices.push(capitalize(&message));
        }
        true
    });

    if authorized {
        visit.finish(redirect("/"))
    } else {
        visit.finish(redirect("/login"))
    }
}

fn handle_export(cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let outcome = state.dataset();
    let Some(filter) = state.authorized_filter(&visit.id, &outcome, now) else {
        return visit.finish(redirect("/login"));
    };

    let view = state.view(&outcome, &filter);
    let body = match export_csv(&view.records) {
        Ok(body) => body,
        Err(err) => {
            warn!("csv export failed: {}", err);
            return visit.finish(warp::reply::with_status(
                err.to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };
    let file_name = view
        .export_file_name
        .unwrap_or_else(|| "location_data.csv".to_string());

    let reply = warp::reply::with_header(body, header::CONTENT_TYPE, "text/csv; charset=utf-8");
    let reply = warp::reply::with_header(
        reply,
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", file_name),
    );
    visit.finish(reply)
}

fn handle_api_view(cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let outcome = state.dataset();
    let Some(filter) = state.authorized_filter(&visit.id, &outcome, now) else {
        return visit.finish(warp::reply::with_status(
            warp::reply::json(&json!({"status": "error", "error": "not authenticated"})),
            StatusCode::UNAUTHORIZED,
        ));
    };
    let view = state.view(&outcome, &filter);
    visit.finish(warp::reply::json(&view))
}

fn handle_reload(cookie: Option<String>, state: Arc<AppState>) -> Response {
    let now = Utc::now();
    let visit = Visit::begin(&state, cookie, now);
    let logged_in = state
        .sessions
        .with_context(&visit.id, |ctx| state.gate.check(&mut ctx.auth, now));
    if logged_in == GateState::LoggedOut {
        return visit.finish(redirect("/login"));
    }
    state.cache.invalidate();
    visit.finish(redirect("/"))
}

fn handle_health(state: Arc<AppState>) -> Response {
    let outcome = state.dataset();
    let status = if outcome.error.is_none() { "ok" } else { "degraded" };
    warp::reply::json(&json!({
        "status": status,
        "records": outcome.dataset.len(),
        "sessions": state.sessions.len(),
        "metrics": state.metrics.snapshot(),
    }))
    .into_response()
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// All dashboard routes.
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let session = warp::cookie::optional::<String>(SESSION_COOKIE);

    let index = warp::path::end()
        .and(warp::get())
        .and(warp::query::<IndexQuery>())
        .and(session)
        .and(state_filter.clone())
        .map(handle_index);

    let login_page = warp::path("login")
        .and(warp::path::end())
        .and(warp::get())
        .and(session)
        .and(state_filter.clone())
        .map(handle_login_page);

    let login_submit = warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(session)
        .and(state_filter.clone())
        .map(handle_login_submit);

    let action = warp::path("action")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(session)
        .and(state_filter.clone())
        .map(handle_action);

    let export = warp::path("export.csv")
        .and(warp::path::end())
        .and(warp::get())
        .and(session)
        .and(state_filter.clone())
        .map(handle_export);

    let api_view = warp::path!("api" / "view")
        .and(warp::get())
        .and(session)
        .and(state_filter.clone())
        .map(handle_api_view);

    let reload = warp::path("reload")
        .and(warp::path::end())
        .and(warp::post())
        .and(session)
        .and(state_filter.clone())
        .map(handle_reload);

    let health = warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .map(handle_health);

    index
        .or(login_page)
        .unify()
        .or(login_submit)
        .unify()
        .or(action)
        .unify()
        .or(export)
        .unify()
        .or(api_view)
        .unify()
        .or(reload)
        .unify()
        .or(health)
        .unify()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        StatusCode::METHOD_NOT_ALLOWED
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };
    debug!("request rejected with {}: {:?}", status, err);
    Ok(warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "error": status.canonical_reason()})),
        status,
    )
    .into_response())
}

/// HTTP front end of the dashboard.
pub struct DashboardServer {
    state: Arc<AppState>,
    bind: SocketAddr,
}

impl DashboardServer {
    pub fn new(config: &DashboardConfig, credentials: Credentials) -> Self {
        Self {
            state: Arc::new(AppState::new(config, credentials)),
            bind: config.bind,
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let routes = routes(self.state.clone())
            .recover(handle_rejection)
            .with(warp::log("dashboard::http"));
        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(self.bind, shutdown)
            .with_context(|| format!("binding dashboard to {}", self.bind))?;
        info!("dashboard listening on http://{}", addr);
        server.await;
        info!("dashboard stopped");
        Ok(())
    }
}
