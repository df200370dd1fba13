//! Embedded HTML/CSS/JS frontend for the UnicodeFix web interface.
//!
//! The whole page is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.

/// The complete single-page form.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>UnicodeFix - Clean Unicode Text</title>
<style>
:root {
  --bg: #f6f8fa;
  --surface: #ffffff;
  --border: #d0d7de;
  --text: #1f2328;
  --text-muted: #656d76;
  --accent: #007aff;
  --green: #1a7f37;
  --red: #cf222e;
  --radius: 10px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}
:root.dark {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --red: #f85149;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 15px;
  line-height: 1.5;
  min-height: 100vh;
}

.app { max-width: 880px; margin: 0 auto; padding: 32px 20px; }

header { text-align: center; margin-bottom: 32px; }
header h1 { font-size: 34px; font-weight: 700; color: var(--accent); }
header p { color: var(--text-muted); max-width: 620px; margin: 8px auto 0; }

#darkModeToggle {
  position: fixed; top: 16px; right: 16px;
  background: var(--surface); color: var(--text);
  border: 1px solid var(--border); border-radius: var(--radius);
  padding: 6px 10px; cursor: pointer;
}

.tabs {
  display: flex; justify-content: center; gap: 4px;
  margin: 0 auto 24px; padding: 4px; width: fit-content;
  background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius);
}
.tabs button {
  border: none; background: transparent; color: var(--text-muted);
  padding: 10px 22px; border-radius: 7px; font-size: 14px; cursor: pointer;
}
.tabs button.active { background: var(--accent); color: #fff; }

.card {
  background: var(--surface); border: 1px solid var(--border);
  border-radius: var(--radius); padding: 20px; margin-bottom: 20px;
}
.card label { display: block; font-weight: 600; margin-bottom: 10px; }

textarea {
  width: 100%; min-height: 180px; resize: vertical;
  padding: 12px; font-family: var(--mono); font-size: 13px;
  background: var(--bg); color: var(--text);
  border: 1px solid var(--border); border-radius: 8px;
}

#dropZone {
  border: 2px dashed var(--border); border-radius: var(--radius);
  padding: 40px 20px; text-align: center; cursor: pointer; color: var(--text-muted);
}
#dropZone.dragging, #dropZone:hover { border-color: var(--accent); }
#dropZone strong { color: var(--accent); }
#fileName { margin-top: 8px; font-family: var(--mono); font-size: 13px; }

.actions { text-align: center; margin-bottom: 20px; }
.btn {
  background: var(--accent); color: #fff; border: none;
  padding: 12px 32px; border-radius: 8px; font-size: 15px; font-weight: 600; cursor: pointer;
}
.btn:disabled { opacity: 0.5; cursor: not-allowed; }
.btn.secondary { background: var(--bg); color: var(--text); border: 1px solid var(--border); padding: 8px 16px; font-size: 13px; }
.btn.done { background: var(--green); color: #fff; }

.results-head { display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px; }
.results-head h3 { font-size: 17px; }
.results-head div { display: flex; gap: 8px; }
.stats {
  display: flex; justify-content: space-between;
  background: var(--bg); border-radius: 8px; padding: 10px 14px; margin-bottom: 12px;
  color: var(--text-muted); font-size: 13px;
}
.stats span span { color: var(--accent); font-weight: 600; }

#errorAlert {
  border: 1px solid var(--red); color: var(--red);
  border-radius: var(--radius); padding: 14px 18px; margin-bottom: 20px;
}

.hidden { display: none !important; }
footer { text-align: center; color: var(--text-muted); font-size: 13px; margin-top: 40px; }
</style>
</head>
<body>
<button id="darkModeToggle" title="Toggle dark mode">&#9680;</button>
<div class="app">
  <header>
    <h1>UnicodeFix</h1>
    <p>Clean problematic Unicode characters from your text. Remove invisible characters,
       fix smart quotes and dashes, and normalize text for better compatibility.</p>
  </header>

  <div class="tabs">
    <button id="textModeBtn" class="active">Paste Text</button>
    <button id="fileModeBtn">Upload File</button>
  </div>

  <div id="textMode" class="card">
    <label for="textInput">Enter your text to clean:</label>
    <textarea id="textInput" rows="8"></textarea>
  </div>

  <div id="fileMode" class="card hidden">
    <label>Upload a text file to clean:</label>
    <div id="dropZone">
      <p><strong>Click to upload</strong> or drag and drop</p>
      <p>TXT, MD, or other text files</p>
      <p id="fileName"></p>
    </div>
    <input type="file" id="fileInput" class="hidden"
      accept=".txt,.md,.text,.log,.csv,.json,.xml,.html,.css,.js,.py,.php,.java,.cpp,.c,.h">
  </div>

  <div class="actions">
    <button id="cleanBtn" class="btn">Clean Text</button>
  </div>

  <div id="errorAlert" class="hidden"><strong>Error:</strong> <span id="errorMessage"></span></div>

  <div id="results" class="card hidden">
    <div class="results-head">
      <h3>Cleaned Text</h3>
      <div>
        <button id="copyBtn" class="btn secondary">Copy</button>
        <button id="downloadBtn" class="btn secondary">Download</button>
      </div>
    </div>
    <div class="stats">
      <span>Changes made: <span id="changesCount">0</span></span>
      <span>Size: <span id="sizeInfo">0 &rarr; 0 chars</span></span>
    </div>
    <textarea id="resultText" rows="8" readonly></textarea>
  </div>

  <footer>UnicodeFix Web Interface</footer>
</div>

<script>
const $ = (id) => document.getElementById(id);

const state = { mode: 'text', file: null, lastResult: null };

$('textInput').placeholder =
  'Paste your text here. It can contain problematic Unicode characters like ' +
  '“smart quotes”, em—dashes, invisible characters, etc.';

// ---------------------------------------------------------------------------
// Mode switching
// ---------------------------------------------------------------------------

function switchMode(mode) {
  state.mode = mode;
  $('textMode').classList.toggle('hidden', mode !== 'text');
  $('fileMode').classList.toggle('hidden', mode !== 'file');
  $('textModeBtn').classList.toggle('active', mode === 'text');
  $('fileModeBtn').classList.toggle('active', mode === 'file');
  hideResults();
  hideError();
}

$('textModeBtn').addEventListener('click', () => switchMode('text'));
$('fileModeBtn').addEventListener('click', () => switchMode('file'));

// ---------------------------------------------------------------------------
// File selection
// ---------------------------------------------------------------------------

function selectFile(file) {
  state.file = file;
  $('fileName').textContent = file ? file.name : '';
  if (file) processFile(file);
}

$('dropZone').addEventListener('click', () => $('fileInput').click());
$('dropZone').addEventListener('dragover', (e) => {
  e.preventDefault();
  $('dropZone').classList.add('dragging');
});
$('dropZone').addEventListener('dragleave', () => $('dropZone').classList.remove('dragging'));
$('dropZone').addEventListener('drop', (e) => {
  e.preventDefault();
  $('dropZone').classList.remove('dragging');
  if (e.dataTransfer.files.length > 0) selectFile(e.dataTransfer.files[0]);
});
$('fileInput').addEventListener('change', (e) => {
  if (e.target.files.length > 0) selectFile(e.target.files[0]);
});

// ---------------------------------------------------------------------------
// API calls
// ---------------------------------------------------------------------------

async function postClean(path, init, filename) {
  setLoading(true);
  hideError();
  try {
    const res = await fetch(path, Object.assign({ method: 'POST' }, init));
    const result = await res.json();
    if (result.success) {
      showResults(result, filename);
    } else {
      showError(result.error || 'Failed to clean text');
    }
  } catch (err) {
    console.error(err);
    showError('Network error. Please try again.');
  } finally {
    setLoading(false);
  }
}

function cleanText(text) {
  return postClean('/api/clean-text', {
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text: text, preserve_formatting: true }),
  }, null);
}

function processFile(file) {
  const form = new FormData();
  form.append('file', file);
  return postClean('/api/clean-file', { body: form }, file.name);
}

async function process() {
  hideError();
  if (state.mode === 'text') {
    const text = $('textInput').value;
    if (!text.trim()) {
      showError('Please enter some text to clean.');
      return;
    }
    await cleanText(text);
  } else {
    if (!state.file) {
      showError('Please select a file to clean.');
      return;
    }
    await processFile(state.file);
  }
}

$('cleanBtn').addEventListener('click', process);

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

function showResults(result, filename) {
  $('resultText').value = result.cleaned_text;
  $('changesCount').textContent = result.changes_made;
  $('sizeInfo').textContent = `${result.original_size} → ${result.cleaned_size} chars`;
  state.lastResult = { text: result.cleaned_text, filename: filename };
  $('results').classList.remove('hidden');
  $('results').scrollIntoView({ behavior: 'smooth', block: 'start' });
}

function hideResults() { $('results').classList.add('hidden'); }

function showError(message) {
  $('errorMessage').textContent = message;
  $('errorAlert').classList.remove('hidden');
}

function hideError() { $('errorAlert').classList.add('hidden'); }

function setLoading(loading) {
  $('cleanBtn').disabled = loading;
  $('cleanBtn').textContent = loading ? 'Processing...' : 'Clean Text';
}

function flash(id, message) {
  const btn = $(id);
  const original = btn.textContent;
  btn.textContent = message;
  btn.classList.add('done');
  setTimeout(() => { btn.textContent = original; btn.classList.remove('done'); }, 2000);
}

$('copyBtn').addEventListener('click', async () => {
  try {
    await navigator.clipboard.writeText($('resultText').value);
  } catch (err) {
    $('resultText').select();
    document.execCommand('copy');
  }
  flash('copyBtn', 'Copied!');
});

$('downloadBtn').addEventListener('click', () => {
  if (!state.lastResult) return;
  const blob = new Blob([state.lastResult.text], { type: 'text/plain' });
  const url = URL.createObjectURL(blob);
  const a = document.createElement('a');
  a.href = url;
  a.download = state.lastResult.filename
    ? state.lastResult.filename.replace(/\.[^/.]+$/, '') + '.clean.txt'
    : 'cleaned-text.txt';
  document.body.appendChild(a);
  a.click();
  document.body.removeChild(a);
  URL.revokeObjectURL(url);
  flash('downloadBtn', 'Downloaded!');
});

// ---------------------------------------------------------------------------
// Dark mode and keyboard shortcuts
// ---------------------------------------------------------------------------

if (localStorage.getItem('darkMode') !== 'false') {
  document.documentElement.classList.add('dark');
}
$('darkModeToggle').addEventListener('click', () => {
  const dark = document.documentElement.classList.toggle('dark');
  localStorage.setItem('darkMode', dark);
});

document.addEventListener('keydown', (e) => {
  if ((e.ctrlKey || e.metaKey) && e.key === 'Enter') {
    e.preventDefault();
    process();
  }
  if (e.key === 'Escape') {
    hideResults();
    hideError();
  }
});
</script>
</body>
</html>
"##;
