use crate::catalog::{self, MetricDefinition};
use crate::models::ChannelStatus;
use crate::range::RangeWindow;
use crate::state::Selection;

const RANGES: [RangeWindow; 4] = [
    RangeWindow::Day,
    RangeWindow::Week,
    RangeWindow::Year,
    RangeWindow::All,
];

pub fn render_index(selection: &Selection, channel: &ChannelStatus) -> String {
    INDEX_HTML
        .replace("{{METRIC_OPTIONS}}", &metric_options(&selection.metric))
        .replace("{{RANGE_BUTTONS}}", &range_buttons(selection.range))
        .replace("{{FORM_FIELDS}}", &form_fields())
        .replace("{{FILE_STATUS}}", &escape(&channel.status))
        .replace("{{FILE_STATUS_TYPE}}", if channel.connected { "ok" } else { "" })
}

fn metric_options(selected: &str) -> String {
    catalog::all()
        .iter()
        .map(|metric| {
            let marker = if metric.key == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{marker}>{}</option>"#,
                metric.key,
                escape(metric.label)
            )
        })
        .collect()
}

fn range_buttons(active: RangeWindow) -> String {
    RANGES
        .iter()
        .map(|range| {
            let class = if *range == active { "seg active" } else { "seg" };
            format!(r#"<button class="{class}" type="button" data-range="{range}">{range}</button>"#)
        })
        .collect()
}

fn form_fields() -> String {
    catalog::inputs().map(form_field).collect()
}

fn form_field(metric: &MetricDefinition) -> String {
    let label = escape(metric.label);
    let key = metric.key;
    if metric.is_boolean {
        return format!(
            r#"<label>{label}<select data-key="{key}"><option value="0">No</option><option value="1">Yes</option></select></label>"#
        );
    }
    let toggle = if metric.privacy_hideable {
        format!(r#"<span class="hide"><input type="checkbox" data-hide="{key}" /> hide</span>"#)
    } else {
        String::new()
    };
    format!(
        r#"<label>{label}{toggle}<input type="number" step="any" data-key="{key}" /></label>"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Ascend Dashboard</title>
  <style>
    :root {
      --bg: #0e1420;
      --panel: #161f2e;
      --line: rgba(255, 255, 255, 0.08);
      --text: #e8eef7;
      --muted: #8a96a8;
      --good: #3ddc97;
      --bad: #ff5c7a;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      background: var(--bg);
      color: var(--text);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 24px;
    }
    main { max-width: 1100px; margin: 0 auto; display: grid; gap: 20px; }
    h1 { margin: 0; font-size: 1.8rem; }
    .card { background: var(--panel); border: 1px solid var(--line); border-radius: 16px; padding: 18px; }
    .grid { display: grid; grid-template-columns: 340px 1fr; gap: 20px; }
    .fields { display: grid; gap: 10px; }
    label { display: grid; gap: 4px; font-size: 0.85rem; color: var(--muted); }
    input, select, button {
      background: #0b111b;
      color: var(--text);
      border: 1px solid var(--line);
      border-radius: 10px;
      padding: 8px 10px;
      font: inherit;
    }
    button { cursor: pointer; }
    .row { display: flex; flex-wrap: wrap; gap: 8px; align-items: center; }
    .seg.active { background: var(--text); color: var(--bg); }
    .hide { font-size: 0.75rem; }
    .stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 12px; }
    .stat .label { font-size: 0.75rem; color: var(--muted); text-transform: uppercase; letter-spacing: 0.08em; }
    .stat .value { font-size: 1.4rem; font-weight: 600; }
    #chart { width: 100%; height: 280px; display: block; }
    #chart text { fill: var(--muted); font-size: 11px; }
    .status { min-height: 1.2em; color: var(--muted); }
    .status[data-type="ok"] { color: var(--good); }
    .status[data-type="error"] { color: var(--bad); }
    @media (max-width: 800px) { .grid { grid-template-columns: 1fr; } }
  </style>
</head>
<body>
  <main>
    <header class="row">
      <h1>Ascend</h1>
      <span id="fileStatus" class="status" data-type="{{FILE_STATUS_TYPE}}">{{FILE_STATUS}}</span>
    </header>

    <section class="card row">
      <button id="btnConnect" type="button">Connect file</button>
      <button id="btnLoad" type="button">Load</button>
      <button id="btnUpload" type="button">Upload</button>
      <button id="btnSave" type="button">Save</button>
      <input id="uploadInput" type="file" accept=".json,application/json" hidden />
    </section>

    <div class="grid">
      <section class="card fields">
        <label>Date<input id="date" type="date" /></label>
        {{FORM_FIELDS}}
        <div class="row">
          <button id="btnLog" type="button">Log day</button>
          <button id="btnFillLatest" type="button">Fill from latest</button>
        </div>
        <div id="logStatus" class="status"></div>
      </section>

      <section class="card fields">
        <div class="row">
          <select id="metric">{{METRIC_OPTIONS}}</select>
          <div class="row" id="ranges">{{RANGE_BUTTONS}}</div>
        </div>
        <svg id="chart" viewBox="0 0 640 280" role="img" aria-label="Metric chart"></svg>
        <div class="stats">
          <div class="stat"><div class="label">Average</div><div class="value" id="avgVal">—</div></div>
          <div class="stat"><div class="label">Change</div><div class="value" id="deltaVal">—</div></div>
          <div class="stat"><div class="label">Hours this week</div><div class="value" id="weekHours">—</div></div>
          <div class="stat"><div class="label">Progress</div><div class="value" id="progress">—</div></div>
          <div class="stat"><div class="label">Creatine streak</div><div class="value" id="streakCreatine">0</div></div>
          <div class="stat"><div class="label">Ashwagandha streak</div><div class="value" id="streakAshwagandha">0</div></div>
          <div class="stat"><div class="label">Vitamin D streak</div><div class="value" id="streakVitD">0</div></div>
          <div class="stat"><div class="label">Nicotine-free</div><div class="value" id="streakNicotine">0</div></div>
        </div>
      </section>
    </div>
  </main>

  <script>
    const el = (id) => document.getElementById(id);
    let range = document.querySelector('.seg.active')?.dataset.range || '1W';

    const setStatus = (target, message, type) => {
      const node = el(target);
      node.textContent = message;
      node.dataset.type = type || '';
    };

    const today = () => {
      const d = new Date();
      return new Date(d.getTime() - d.getTimezoneOffset() * 60000).toISOString().slice(0, 10);
    };

    const request = async (url, options) => {
      const res = await fetch(url, options);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res;
    };

    const drawChart = (series) => {
      const svg = el('chart');
      const points = series.values
        .map((value, index) => ({ value, index, label: series.labels[index], text: series.display[index] }))
        .filter((point) => point.value !== null);
      if (!points.length) {
        svg.innerHTML = '<text x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }
      const width = 640, height = 280, padX = 48, padY = 32;
      let min = Math.min(...points.map((p) => p.value));
      let max = Math.max(...points.map((p) => p.value));
      if (min === max) { min -= 1; max += 1; }
      const span = Math.max(series.values.length - 1, 1);
      const x = (index) => padX + (index * (width - padX * 2)) / span;
      const y = (value) => height - padY - ((value - min) * (height - padY * 2)) / (max - min);
      const path = points.map((p, i) => `${i ? 'L' : 'M'} ${x(p.index).toFixed(1)} ${y(p.value).toFixed(1)}`).join(' ');
      const dots = points
        .map((p) => `<circle cx="${x(p.index)}" cy="${y(p.value)}" r="3" fill="${series.color}"><title>${p.label}: ${p.text}</title></circle>`)
        .join('');
      const first = points[0], last = points[points.length - 1];
      svg.innerHTML = `
        <path d="${path}" fill="none" stroke="${series.color}" stroke-width="2.5" />
        ${dots}
        <text x="${padX}" y="${height - 8}">${first.label}</text>
        <text x="${width - padX}" y="${height - 8}" text-anchor="end">${last.label}</text>
        <text x="4" y="${padY}">${max}</text>
        <text x="4" y="${height - padY}">${min}</text>`;
    };

    const render = async () => {
      const metric = el('metric').value;
      const res = await request('/api/selection', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ metric, range }),
      });
      const view = await res.json();
      drawChart(view.series);
      el('avgVal').textContent = view.averageDisplay;
      el('deltaVal').textContent = view.deltaDisplay.text;
      el('deltaVal').style.color = view.deltaDisplay.color;
      el('weekHours').textContent = view.weekHoursDisplay;
      el('progress').textContent = view.progress === null ? '—' : `${view.progress}%`;
      el('streakCreatine').textContent = view.streaks.creatine;
      el('streakAshwagandha').textContent = view.streaks.ashwagandha;
      el('streakVitD').textContent = view.streaks.vitD;
      el('streakNicotine').textContent = view.streaks.nicotineSober;
    };

    const applyPrivacy = () => {
      document.querySelectorAll('[data-hide]').forEach((box) => {
        const input = document.querySelector(`input[data-key="${box.dataset.hide}"]`);
        input.type = box.checked ? 'password' : 'number';
      });
    };

    const readForm = () => {
      const values = {};
      document.querySelectorAll('[data-key]').forEach((input) => { values[input.dataset.key] = input.value; });
      const hidden = Array.from(document.querySelectorAll('[data-hide]:checked')).map((box) => box.dataset.hide);
      return { date: el('date').value || today(), values, hidden };
    };

    const fillForm = (form) => {
      el('date').value = form.date || today();
      document.querySelectorAll('[data-key]').forEach((input) => {
        input.value = form.values[input.dataset.key] ?? '';
      });
      document.querySelectorAll('[data-hide]').forEach((box) => {
        box.checked = form.hidden.includes(box.dataset.hide);
      });
      applyPrivacy();
    };

    const refreshFileStatus = async () => {
      const status = await (await request('/api/channel')).json();
      setStatus('fileStatus', status.status, status.connected ? 'ok' : '');
    };

    const action = (target, work) => async () => {
      try {
        const message = await work();
        setStatus(target, message, 'ok');
      } catch (err) {
        setStatus(target, err.message, 'error');
      }
    };

    const loadLatest = async () => {
      const res = await fetch('/api/entries/latest');
      if (res.ok) {
        fillForm(await res.json());
      }
    };

    el('btnLog').addEventListener('click', action('logStatus', async () => {
      const res = await request('/api/entries', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(readForm())
      });
      await render();
      return (await res.json()).status;
    }));

    el('btnFillLatest').addEventListener('click', action('logStatus', async () => {
      const date = el('date').value || today();
      const res = await request(`/api/entries/latest?date=${date}`);
      fillForm(await res.json());
      return 'Filled from latest.';
    }));

    el('btnConnect').addEventListener('click', action('fileStatus', async () => {
      const path = window.prompt('Path to data.json');
      if (!path) {
        throw new Error('Not connected');
      }
      const res = await request('/api/channel', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ path })
      });
      return (await res.json()).status;
    }));

    el('btnLoad').addEventListener('click', action('logStatus', async () => {
      const res = await request('/api/load', { method: 'POST' });
      await loadLatest();
      await render();
      return (await res.json()).status;
    }));

    el('btnUpload').addEventListener('click', () => el('uploadInput').click());
    el('uploadInput').addEventListener('change', action('logStatus', async () => {
      const file = el('uploadInput').files[0];
      if (!file) {
        throw new Error('Load failed: No file selected');
      }
      const res = await request(`/api/upload?name=${encodeURIComponent(file.name)}`, {
        method: 'POST',
        body: await file.text()
      });
      el('uploadInput').value = '';
      await refreshFileStatus();
      await loadLatest();
      await render();
      return (await res.json()).status;
    }));

    el('btnSave').addEventListener('click', action('logStatus', async () => {
      const res = await request('/api/save', { method: 'POST' });
      const disposition = res.headers.get('content-disposition') || '';
      if (!disposition.startsWith('attachment')) {
        return (await res.json()).status;
      }
      const url = URL.createObjectURL(await res.blob());
      const link = document.createElement('a');
      link.href = url;
      link.download = /filename="([^"]+)"/.exec(disposition)?.[1] || 'data.json';
      document.body.appendChild(link);
      link.click();
      link.remove();
      URL.revokeObjectURL(url);
      return res.headers.get('x-ascend-status') || 'Downloaded';
    }));

    document.querySelectorAll('.seg').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('.seg').forEach((other) => other.classList.remove('active'));
        button.classList.add('active');
        range = button.dataset.range;
        render().catch((err) => setStatus('logStatus', err.message, 'error'));
      });
    });

    document.querySelectorAll('[data-hide]').forEach((box) => box.addEventListener('change', applyPrivacy));
    el('metric').addEventListener('change', () => render().catch((err) => setStatus('logStatus', err.message, 'error')));

    el('date').value = today();
    loadLatest()
      .then(render)
      .catch((err) => setStatus('logStatus', err.message, 'error'));
  </script>
</body>
</html>
"#;
