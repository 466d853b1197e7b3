//! HTTP server for the interactive dashboard.
//!
//! Serves a single HTML page that builds its controls from `/api/layout`,
//! learns which charts depend on which controls from `/api/dependencies`,
//! and posts to `/api/update` whenever a control changes.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::callbacks::{CallbackRegistry, Dependency, UpdateRequest, UpdateResponse};
use crate::cli::ServerConfig;
use crate::error::CallbackError;
use crate::layout::{build_layout, Layout};
use crate::model::LaunchTable;

/// Immutable per-process context handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<LaunchTable>,
    pub callbacks: Arc<CallbackRegistry>,
    pub layout: Arc<Layout>,
}

impl AppState {
    pub fn new(table: LaunchTable) -> Self {
        let layout = build_layout(&table);
        Self {
            table: Arc::new(table),
            callbacks: Arc::new(CallbackRegistry::standard()),
            layout: Arc::new(layout),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/api/layout", get(get_layout))
        .route("/api/dependencies", get(get_dependencies))
        .route("/api/update", post(post_update))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn run_server(config: &ServerConfig, table: LaunchTable) -> Result<()> {
    let state = AppState::new(table);
    for binding in state.callbacks.bindings() {
        let inputs: Vec<String> = binding.inputs.iter().map(|i| i.key()).collect();
        info!(output = %binding.output, inputs = ?inputs, "bound callback");
    }
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!("dashboard listening on http://{}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) async fn healthz() -> impl IntoResponse {
    "ok"
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn get_layout(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout.as_ref().clone())
}

pub(crate) async fn get_dependencies(State(state): State<AppState>) -> Json<Vec<Dependency>> {
    Json(state.callbacks.dependencies())
}

pub(crate) async fn post_update(
    State(state): State<AppState>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<UpdateResponse>, CallbackError> {
    match state.callbacks.dispatch(&state.table, &request) {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            warn!(output = %request.output, error = %err, "rejected update");
            Err(err)
        }
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Launch Records Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        :root {
            --bg-primary: #ffffff;
            --bg-secondary: #f6f7f9;
            --border-color: #dfe3e8;
            --text-primary: #1f2933;
            --text-muted: #6b7785;
            --accent-primary: #3b82f6;
            --space-2: 8px;
            --space-4: 16px;
            --space-6: 32px;
            --radius-md: 10px;
            --font-sans: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: var(--font-sans);
            background: var(--bg-primary);
            color: var(--text-primary);
            padding: var(--space-6);
        }

        .main { max-width: 1100px; margin: 0 auto; }

        h1 { margin-bottom: var(--space-6); }

        select, .site-search {
            width: 100%;
            margin-bottom: var(--space-2);
            padding: var(--space-2);
            border: 1px solid var(--border-color);
            border-radius: var(--radius-md);
            font-size: 0.95rem;
        }

        .chart-card {
            background: var(--bg-secondary);
            border: 1px solid var(--border-color);
            border-radius: var(--radius-md);
            padding: var(--space-4);
            margin: var(--space-4) 0;
        }

        .chart-title { font-weight: 600; margin-bottom: var(--space-2); }
        .chart-wrapper { position: relative; height: 360px; }
        .chart-empty { color: var(--text-muted); font-size: 0.85rem; }

        .slider-row { display: flex; gap: var(--space-4); align-items: center; }
        .slider-row input[type="range"] { flex: 1; }
        .slider-value { font-family: monospace; min-width: 12ch; text-align: right; }
        .marks { display: flex; justify-content: space-between; color: var(--text-muted); font-size: 0.75rem; }
    </style>
</head>
<body>
    <main class="main">
        <h1 id="heading"></h1>

        <input type="search" id="site-search" class="site-search">
        <select id="site-dropdown"></select>

        <div class="chart-card">
            <div class="chart-title" id="success-pie-chart-title"></div>
            <div class="chart-wrapper"><canvas id="success-pie-chart"></canvas></div>
        </div>

        <p id="slider-label"></p>
        <div class="slider-row">
            <input type="range" id="payload-low">
            <input type="range" id="payload-high">
            <span class="slider-value" id="payload-value"></span>
        </div>
        <div class="marks" id="slider-marks"></div>

        <div class="chart-card">
            <div class="chart-title" id="success-payload-scatter-chart-title"></div>
            <div class="chart-wrapper"><canvas id="success-payload-scatter-chart"></canvas></div>
        </div>
    </main>

    <script>
        const PALETTE = ['#636efa', '#ef553b', '#00cc96', '#ab63fa', '#ffa15a', '#19d3f3', '#ff6692', '#b6e880'];
        const inputs = {};
        const charts = {};
        let dependencies = [];

        async function loadLayout() {
            const layout = await (await fetch('/api/layout')).json();
            dependencies = await (await fetch('/api/dependencies')).json();

            const heading = document.getElementById('heading');
            heading.textContent = layout.heading.text;
            heading.style.textAlign = layout.heading.text_align;
            heading.style.color = layout.heading.color;
            heading.style.fontSize = layout.heading.font_size + 'px';

            const select = document.getElementById(layout.dropdown.id);
            const placeholder = document.createElement('option');
            placeholder.value = '';
            placeholder.textContent = layout.dropdown.placeholder;
            placeholder.disabled = true;
            select.appendChild(placeholder);
            layout.dropdown.options.forEach(o => {
                const opt = document.createElement('option');
                opt.value = o.value;
                opt.textContent = o.label;
                select.appendChild(opt);
            });
            select.value = layout.dropdown.value;

            const search = document.getElementById('site-search');
            if (layout.dropdown.searchable) {
                search.placeholder = layout.dropdown.placeholder;
                search.addEventListener('input', () => {
                    const needle = search.value.trim().toLowerCase();
                    Array.from(select.options).forEach(opt => {
                        if (opt === placeholder) { return; }
                        opt.hidden = needle !== '' && !opt.textContent.toLowerCase().includes(needle);
                    });
                    const visible = Array.from(select.options).filter(o => !o.hidden && o !== placeholder);
                    if (visible.length === 1 && select.value !== visible[0].value) {
                        select.value = visible[0].value;
                        changed(layout.dropdown.id + '.value', select.value);
                    }
                });
            } else {
                search.remove();
            }
            inputs[layout.dropdown.id + '.value'] = layout.dropdown.value;
            select.addEventListener('change', () => changed(layout.dropdown.id + '.value', select.value));

            const s = layout.slider;
            document.getElementById('slider-label').textContent = s.label;
            document.getElementById('slider-marks').innerHTML =
                s.marks.map(m => `<span>${m.label}</span>`).join('');
            const key = s.id + '.value';
            const low = document.getElementById('payload-low');
            const high = document.getElementById('payload-high');
            [low, high].forEach((el, i) => {
                el.min = s.min;
                el.max = s.max;
                el.step = s.step;
                el.value = s.value[i];
            });
            inputs[key] = s.value.slice();
            showRange(inputs[key]);

            const readRange = () => {
                let a = parseFloat(low.value), b = parseFloat(high.value);
                if (a > b) { [a, b] = [b, a]; }
                return [a, b];
            };
            // dragging only moves the readout; the request goes out on release
            const onSlide = () => showRange(readRange());
            const onRelease = () => changed(key, readRange());
            [low, high].forEach(el => {
                el.addEventListener('input', onSlide);
                el.addEventListener('change', onRelease);
            });

            dependencies.forEach(update);
        }

        function showRange(r) {
            document.getElementById('payload-value').textContent = `${r[0]} – ${r[1]}`;
        }

        function changed(key, value) {
            inputs[key] = value;
            dependencies.filter(d => d.inputs.includes(key)).forEach(update);
        }

        // newest request id per output; older responses are dropped
        const latest = {};

        async function update(dep) {
            const body = { output: dep.output, inputs: {} };
            dep.inputs.forEach(k => { body.inputs[k] = inputs[k]; });
            const seq = (latest[dep.output] || 0) + 1;
            latest[dep.output] = seq;

            let res;
            try {
                res = await fetch('/api/update', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(body)
                });
            } catch (err) {
                console.warn(`update ${dep.output} failed:`, err);
                return;
            }
            if (seq !== latest[dep.output]) { return; }

            if (!res.ok) {
                const text = await res.text();
                let message = text;
                try { message = JSON.parse(text).error || text; } catch (_) {}
                console.warn(`update ${dep.output} rejected (${res.status}):`, message);
                return;
            }
            const data = await res.json();
            if (seq !== latest[dep.output]) { return; }
            render(dep.output.split('.')[0], data.figure);
        }

        function render(id, figure) {
            document.getElementById(id + '-title').textContent = figure.title;
            if (charts[id]) { charts[id].destroy(); }

            const ctx = document.getElementById(id);
            if (figure.type === 'pie') {
                charts[id] = new Chart(ctx, {
                    type: 'pie',
                    data: {
                        labels: figure.slices.map(s => s.label),
                        datasets: [{
                            data: figure.slices.map(s => s.value),
                            backgroundColor: figure.slices.map((_, i) => PALETTE[i % PALETTE.length])
                        }]
                    },
                    options: { responsive: true, maintainAspectRatio: false }
                });
            } else {
                charts[id] = new Chart(ctx, {
                    type: 'scatter',
                    data: {
                        datasets: figure.series.map((s, i) => ({
                            label: s.category,
                            data: s.points,
                            backgroundColor: PALETTE[i % PALETTE.length]
                        }))
                    },
                    options: {
                        responsive: true,
                        maintainAspectRatio: false,
                        scales: {
                            x: { title: { display: true, text: figure.x_label } },
                            y: { title: { display: true, text: figure.y_label }, ticks: { stepSize: 1 } }
                        }
                    }
                });
            }
        }

        loadLayout();
    </script>
</body>
</html>"#;
