use std::sync::Arc;

use axum::{extract::State, response::Html};

use crate::state::AppState;

const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Web Image Converter</title>
<style>
body { font-family: sans-serif; max-width: 46rem; margin: 2rem auto; }
fieldset { margin-bottom: 1.5rem; }
label { display: block; margin: .4rem 0; }
pre { background: #f4f4f4; padding: .6rem; white-space: pre-wrap; }
</style>
</head>
<body>
<h1>Web Image Converter</h1>

<fieldset>
<legend>Options</legend>
<label>Quality <input id="quality" type="number" min="1" max="100" value="{{quality}}"></label>
<label><input id="keep_png" type="checkbox"> Keep PNG files as PNG</label>
<label><input id="enhance_filenames" type="checkbox"> Add SKU and -web to file names</label>
</fieldset>

<fieldset>
<legend>CSV of image URLs</legend>
<input id="csv" type="file" accept=".csv,text/csv">
<label>Column <select id="column"><option>{{column}}</option></select></label>
<button id="process" disabled>Download and convert</button>
</fieldset>

<fieldset>
<legend>Images</legend>
<input id="images" type="file" multiple accept="image/*">
<label>Folder key <input id="folder_key" type="text" placeholder="today"></label>
<button id="upload">Upload and convert</button>
</fieldset>

<pre id="result"></pre>

<script>
let token = null;
const $ = (id) => document.getElementById(id);
const show = (data) => { $("result").textContent = JSON.stringify(data, null, 2); };
const options = () => ({
  quality: $("quality").value,
  keep_png: $("keep_png").checked,
  enhance_filenames: $("enhance_filenames").checked,
});

$("csv").addEventListener("change", async () => {
  const body = new FormData();
  body.append("file", $("csv").files[0]);
  const data = await (await fetch("/csv/prepare", { method: "POST", body })).json();
  show(data);
  if (!data.token) return;
  token = data.token;
  $("column").innerHTML = "";
  for (const name of data.columns) {
    const option = new Option(name, name, false, name === data.default_column);
    $("column").add(option);
  }
  $("process").disabled = false;
});

$("process").addEventListener("click", async () => {
  $("process").disabled = true;
  const res = await fetch("/csv/process", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ token, column: $("column").value, ...options() }),
  });
  show(await res.json());
  token = null;
});

$("upload").addEventListener("click", async () => {
  const body = new FormData();
  for (const file of $("images").files) body.append("images", file);
  for (const [key, value] of Object.entries(options())) body.append(key, value);
  body.append("folder_key", $("folder_key").value);
  show(await (await fetch("/upload-images", { method: "POST", body })).json());
});
</script>
</body>
</html>
"#;

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Upload form, prefilled with the configured quality and column.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(
        PAGE.replace("{{quality}}", &state.config.default_quality.to_string())
            .replace("{{column}}", &escape_html(&state.config.default_csv_column)),
    )
}
