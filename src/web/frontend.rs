//! Embedded HTML/CSS/JS frontend for the mldash web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. All state lives
//! server-side; the page only renders the view returned by `/api/page`.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>mldash</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #6366f1;
  --green: #10b981;
  --yellow: #f59e0b;
  --red: #ef4444;
  --purple: #8b5cf6;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app { max-width: 1200px; margin: 0 auto; padding: 24px; }
header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 20px; font-weight: 600; }
header h1 span { color: var(--accent); }
nav { display: flex; gap: 4px; }
nav button {
  background: none;
  border: 1px solid transparent;
  color: var(--text-muted);
  padding: 6px 14px;
  border-radius: var(--radius);
  cursor: pointer;
  font-size: 13px;
}
nav button:hover { color: var(--text); }
nav button.active { color: var(--text); border-color: var(--border); background: var(--surface); }

/* Cards */
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 16px; }
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  margin-bottom: 16px;
}
.card h2 { font-size: 15px; margin-bottom: 8px; }
.card h3 { font-size: 13px; color: var(--text-muted); margin-bottom: 12px; font-weight: 500; }
.card.clickable { cursor: pointer; }
.card.clickable:hover { border-color: var(--accent); }
.muted { color: var(--text-muted); }
.stat { font-size: 28px; font-weight: 600; }
.badge {
  display: inline-block;
  padding: 1px 8px;
  border-radius: 10px;
  font-size: 11px;
  border: 1px solid var(--border);
  color: var(--text-muted);
}
.method { font-family: var(--mono); font-weight: 600; font-size: 12px; }
.method.GET { color: var(--green); }
.method.POST { color: #58a6ff; }

/* Controls */
.controls { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 16px; }
select, button.primary, input[type=file] {
  background: var(--bg);
  border: 1px solid var(--border);
  color: var(--text);
  border-radius: var(--radius);
  padding: 6px 12px;
  font-size: 13px;
}
button.primary { background: var(--accent); border-color: var(--accent); cursor: pointer; }
button.primary:disabled { opacity: 0.4; cursor: not-allowed; }
.error {
  border: 1px solid var(--red);
  color: var(--red);
  border-radius: var(--radius);
  padding: 10px 14px;
  margin-bottom: 16px;
}
pre {
  font-family: var(--mono);
  font-size: 12px;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 12px;
  overflow-x: auto;
  white-space: pre-wrap;
}

/* Bars and tables */
.bar-row { display: flex; align-items: center; gap: 8px; margin: 4px 0; }
.bar-row .label { width: 90px; color: var(--text-muted); font-size: 12px; }
.bar-row .track { flex: 1; height: 10px; background: var(--bg); border-radius: 5px; overflow: hidden; }
.bar-row .fill { height: 100%; background: var(--accent); }
.bar-row .value { width: 60px; text-align: right; font-family: var(--mono); font-size: 12px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid var(--border); font-size: 13px; }
th { color: var(--text-muted); font-weight: 500; }
.tier-high { background: var(--green); }
.tier-medium { background: var(--yellow); }
.tier-low { background: var(--red); }
.positive { color: var(--green); }
.negative { color: var(--red); }
.neutral { color: var(--yellow); }
.caption { font-size: 18px; font-style: italic; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span>ml</span>dash</h1>
    <nav id="nav">
      <button data-page="dashboard">Dashboard</button>
      <button data-page="models">Models</button>
      <button data-page="visualizations">Visualizations</button>
      <button data-page="api-explorer">API Explorer</button>
    </nav>
  </header>
  <main id="main"></main>
</div>

<script>
const $main = document.getElementById('main');
let endpoints = [];
let baseUrl = '';
let models = [];

function esc(s) {
  return String(s ?? '').replace(/[&<>"']/g, c => ({
    '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
  }[c]));
}

async function api(method, path, body, headers) {
  const res = await fetch(path, { method, body, headers });
  const json = await res.json();
  if (!res.ok) throw new Error(json.error || ('HTTP ' + res.status));
  return json;
}

async function navigate(page, model) {
  let q = 'page=' + encodeURIComponent(page);
  if (model) q += '&model=' + encodeURIComponent(model);
  render(await api('POST', '/api/navigate?' + q));
}

async function act(promise) {
  try {
    render(await promise);
  } catch (e) {
    alert(e.message);
  }
}

function bar(label, pct, value, cls) {
  const w = Math.max(0, Math.min(100, pct));
  return `<div class="bar-row"><div class="label ${esc(label)}">${esc(label)}</div>
    <div class="track"><div class="fill ${cls || ''}" style="width:${w}%"></div></div>
    <div class="value">${esc(value)}</div></div>`;
}

function tier(score) {
  return score >= 0.8 ? 'tier-high' : score >= 0.6 ? 'tier-medium' : 'tier-low';
}

// ---------------------------------------------------------------------------
// Page sections
// ---------------------------------------------------------------------------

function dashboardPage() {
  const cards = models.map(m => `
    <div class="card clickable" onclick="navigate('model-detail','${esc(m.id)}')">
      <h2 style="color:${esc(m.accent_color)}">${esc(m.name)}</h2>
      <h3>${esc(m.model)} · ${esc(m.org)}</h3>
      <p class="muted">${esc(m.description)}</p>
    </div>`).join('');
  return `<div class="grid">
      <div class="card"><h3>Models</h3><div class="stat">${models.length}</div></div>
      <div class="card"><h3>Endpoints</h3><div class="stat">${endpoints.length}</div></div>
      <div class="card"><h3>Inference API</h3><div class="muted">${esc(baseUrl)}</div></div>
    </div><div class="grid">${cards}</div>`;
}

function modelsPage() {
  return '<div class="grid">' + models.map(m => `
    <div class="card clickable" onclick="navigate('model-detail','${esc(m.id)}')">
      <h2>${esc(m.name)} <span class="badge">${esc(m.kind)}</span></h2>
      <h3>${esc(m.model)} · ${esc(m.org)}</h3>
      <p class="muted">${esc(m.description)}</p>
      <p style="margin-top:8px">Accepts: ${esc(m.accepts)}<br>Output: ${esc(m.output)}</p>
      <p class="muted">${esc(m.speed)} · ${esc(m.accuracy)}</p>
    </div>`).join('') + '</div>';
}

function endpointPicker(view, ids) {
  const opts = endpoints.filter(e => !ids || ids.includes(e.id)).map(e =>
    `<option value="${esc(e.id)}" ${view.endpoint && view.endpoint.id === e.id ? 'selected' : ''}>
      ${esc(e.display_name)}</option>`).join('');
  return `<select onchange="act(api('POST','/api/page/endpoint?id='+encodeURIComponent(this.value)))">${opts}</select>`;
}

function uploadControl(view) {
  if (!view.endpoint || !view.endpoint.accepts_file) return '';
  const name = view.file_name ? `<span class="muted">${esc(view.file_name)}</span>` : '';
  return `<input type="file" accept="${esc(view.accept)}" onchange="upload(this.files[0])"> ${name}`;
}

async function upload(file) {
  if (!file) return;
  const bytes = await file.arrayBuffer();
  act(api('POST', '/api/page/file', bytes, { 'X-File-Name': encodeURIComponent(file.name) }));
}

function runButton(view) {
  const label = view.state === 'running' ? 'Running…' : 'Run';
  return `<button class="primary" ${view.can_run ? '' : 'disabled'}
    onclick="this.disabled=true;act(api('POST','/api/page/run'))">${label}</button>`;
}

function outcomeBanner(view) {
  const o = view.outcome;
  if (!o) return '';
  if (o.status === 'failure') return `<div class="error">${esc(o.error)}</div>`;
  return `<p class="muted" style="margin-bottom:12px">Success · ${o.elapsed_ms}ms</p>`;
}

function summaryCards(view) {
  const entries = view.summary || [];
  if (!entries.length) return '';
  const cards = entries.map(e =>
    `<div class="card"><h3 class="${esc(e.label)}">${esc(e.label)}</h3><div class="stat">${e.count}</div></div>`).join('');
  return `<div class="grid"><div class="card"><h3>Total</h3><div class="stat">${view.total_predictions}</div></div>${cards}</div>`;
}

function chartSection(view) {
  const data = view.chart_data;
  if (!data) return '';
  const kinds = ['pie', 'bar', 'line', 'radar'].map(k =>
    `<option value="${k}" ${view.chart === k ? 'selected' : ''}>${k}</option>`).join('');
  let body = '';
  if (!data.series.length) {
    body = '<p class="muted">Nothing to chart</p>';
  } else if (data.kind === 'pie' || data.kind === 'bar') {
    const total = data.series.reduce((a, s) => a + s.value, 0);
    const max = Math.max(...data.series.map(s => s.value));
    body = data.series.map(s => data.kind === 'pie'
      ? bar(s.label, s.value / total * 100, (s.value / total * 100).toFixed(0) + '%')
      : bar(s.label, s.value / max * 100, s.value)).join('');
  } else if (data.kind === 'line') {
    body = data.series.map(p => bar('#' + p.index, p.confidence_pct, p.confidence_pct + '%')).join('');
  } else {
    body = data.series.map(p => bar(p.label, p.percent_of_total, p.percent_of_total + '%')).join('');
  }
  return `<div class="card"><div class="controls"><h2 style="flex:1">Chart</h2>
    <select onchange="act(api('POST','/api/page/chart?kind='+this.value))">${kinds}</select></div>${body}</div>`;
}

function histogramSection(view) {
  if (!view.histogram) return '';
  const max = Math.max(1, ...view.histogram.map(b => b.count));
  return `<div class="card"><h2>Confidence Distribution</h2>${
    view.histogram.map(b => bar(b.range_label, b.count / max * 100, b.count)).join('')}</div>`;
}

function rowsTable(view) {
  if (!view.rows.length) return '';
  const rows = view.rows.map(r => {
    const pct = Math.round(r.confidence_score * 100);
    return `<tr><td>${r.index}</td><td>${esc(r.input_text ?? '—')}</td>
      <td class="${esc(r.label)}">${esc(r.label)}</td>
      <td style="width:200px">${bar('', pct, pct + '%', tier(r.confidence_score))}</td></tr>`;
  }).join('');
  return `<div class="card"><h2>Predictions</h2><table>
    <tr><th>#</th><th>Text</th><th>Label</th><th>Confidence</th></tr>${rows}</table></div>`;
}

function captionSection(view) {
  if (!view.caption) return '';
  return `<div class="card"><h2>Caption</h2><p class="caption">“${esc(view.caption.caption)}”</p>
    <p class="muted">${esc(view.caption.model_name || '')}</p></div>`;
}

function resultSections(view, withCharts) {
  return outcomeBanner(view) + captionSection(view) + summaryCards(view)
    + (withCharts ? chartSection(view) + histogramSection(view) : '')
    + rowsTable(view);
}

function modelDetailPage(view) {
  const m = view.model;
  return `<div class="card"><h2 style="color:${esc(m.accent_color)}">${esc(m.name)}</h2>
      <h3>${esc(m.model)} · ${esc(m.org)} · ${esc(m.kind)}</h3>
      <p>${esc(m.description)}</p>
      <p class="muted" style="margin-top:8px">Use cases: ${m.use_cases.map(esc).join(', ')}</p></div>
    <div class="controls">${uploadControl(view)} ${runButton(view)}</div>`
    + resultSections(view, false);
}

function visualizationsPage(view) {
  return `<div class="controls">${endpointPicker(view, ['text-classification', 'sentiment-analysis'])}
    ${uploadControl(view)} ${runButton(view)}</div>` + resultSections(view, true);
}

function explorerPage(view) {
  const ep = view.endpoint;
  const o = view.outcome;
  const response = o && o.payload
    ? `<div class="card"><h2>Response</h2><pre>${esc(JSON.stringify(o.payload, null, 2))}</pre></div>` : '';
  return `<div class="controls">${endpointPicker(view)} ${uploadControl(view)} ${runButton(view)}</div>
    <div class="card"><h2><span class="method ${esc(ep.method)}">${esc(ep.method)}</span> ${esc(ep.path)}</h2>
      <p class="muted">${esc(ep.description)}</p></div>
    <div class="card"><h2>curl</h2><pre>${esc(view.curl)}</pre></div>`
    + outcomeBanner(view) + response;
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

function render(view) {
  document.querySelectorAll('#nav button').forEach(b => {
    const p = view.page === 'model-detail' ? 'models' : view.page;
    b.classList.toggle('active', b.dataset.page === p);
  });
  switch (view.page) {
    case 'dashboard': $main.innerHTML = dashboardPage(); break;
    case 'models': $main.innerHTML = modelsPage(); break;
    case 'model-detail': $main.innerHTML = modelDetailPage(view); break;
    case 'visualizations': $main.innerHTML = visualizationsPage(view); break;
    case 'api-explorer': $main.innerHTML = explorerPage(view); break;
  }
}

document.querySelectorAll('#nav button').forEach(b =>
  b.addEventListener('click', () => navigate(b.dataset.page)));

(async () => {
  const reg = await api('GET', '/api/endpoints');
  endpoints = reg.endpoints;
  baseUrl = reg.base_url;
  models = (await api('GET', '/api/catalogue')).models;
  render(await api('GET', '/api/page'));
})();
</script>
</body>
</html>
"##;
