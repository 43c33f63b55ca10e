//! The single-page form UI served at `/`.

pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>precis</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; min-height: 12rem; font: inherit; }
  .actions { margin: 0.75rem 0; display: flex; gap: 0.5rem; }
  button { padding: 0.4rem 1rem; font: inherit; cursor: pointer; }
  pre { background: #f4f4f4; padding: 1rem; white-space: pre-wrap; word-break: break-word; }
</style>
</head>
<body>
<h1>precis</h1>
<p>Paste some text, then summarize it, gauge its sentiment, or both.</p>
<textarea id="inputText" placeholder="Text to analyze"></textarea>
<div class="actions">
  <button data-route="/summarize" data-label="Summarizing...">Summarize</button>
  <button data-route="/sentiment" data-label="Analyzing sentiment...">Sentiment</button>
  <button data-route="/analyze" data-label="Running full analysis...">Analyze both</button>
</div>
<pre id="outputBox"></pre>
<script>
  const output = document.getElementById("outputBox");

  async function run(route, label) {
    const text = document.getElementById("inputText").value.trim();
    if (!text) {
      output.textContent = "Please enter some text.";
      return;
    }
    output.textContent = label;
    try {
      const res = await fetch(route, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ text }),
      });
      const data = await res.json();
      output.textContent = JSON.stringify(data, null, 2);
    } catch (err) {
      output.textContent = "Request failed: " + err;
    }
  }

  for (const button of document.querySelectorAll("button[data-route]")) {
    button.addEventListener("click", () => run(button.dataset.route, button.dataset.label));
  }
</script>
</body>
</html>
"#;
