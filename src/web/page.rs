//! Browser chat page.
//!
//! A single self-contained document: it opens a websocket to `/ws`, renders every
//! `colorIndex:payload` frame as a coloured bar followed by the text, and sends each
//! non-empty input line as one text message.

use crate::screen::PALETTE;

const PALETTE_PLACEHOLDER: &str = "__PALETTE__";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Huddle</title>
<style>
body {
    background: black;
    color: #0f0;
    font-family: monospace;
    margin: 0; padding: 10px;
    height: 100vh;
    box-sizing: border-box;
    display: flex;
    flex-direction: column;
}
#chat {
    flex-grow: 1;
    overflow-y: auto;
    white-space: pre-wrap;
    padding-bottom: 10px;
}
#inputLine { display: flex; }
#prompt { user-select: none; padding-right: 5px; }
#msg {
    flex-grow: 1;
    background: black;
    border: none;
    color: #0f0;
    font-family: monospace;
    font-size: 1em;
    outline: none;
    caret-color: #0f0;
}
</style>
</head>
<body>
<div id="chat"></div>
<div id="inputLine">
    <div id="prompt">&gt;</div>
    <input id="msg" autocomplete="off" autofocus />
</div>
<script>
const chat = document.getElementById('chat');
const input = document.getElementById('msg');
const USER_COLORS = __PALETTE__;
let ws;

function appendLine(color, text) {
    const line = document.createElement('div');
    if (color !== null) {
        const bar = document.createElement('span');
        bar.style.color = color;
        bar.textContent = '|';
        line.appendChild(bar);
        if (text.trim() !== '') {
            line.appendChild(document.createTextNode(' ' + text));
        }
    } else {
        line.textContent = text;
    }
    chat.appendChild(line);
    chat.scrollTop = chat.scrollHeight;
}

function appendFrame(frame) {
    const colon = frame.indexOf(':');
    const index = colon > 0 ? Number(frame.slice(0, colon)) : NaN;
    if (Number.isInteger(index) && index >= 0) {
        appendLine(USER_COLORS[index % USER_COLORS.length], frame.slice(colon + 1));
    } else {
        appendLine(null, frame);
    }
}

function connect() {
    const protocol = location.protocol === 'https:' ? 'wss://' : 'ws://';
    ws = new WebSocket(protocol + location.host + '/ws');
    ws.onopen = () => appendLine(null, '[Connected to server]');
    ws.onmessage = (event) => appendFrame(event.data);
    ws.onclose = () => appendLine(null, '[Disconnected]');
    ws.onerror = () => appendLine(null, '[Connection error]');
}

input.addEventListener('keydown', e => {
    if (e.key === 'Enter') {
        e.preventDefault();
        const msg = input.value.trim();
        if (msg !== '') {
            appendLine('#0f0', msg);
            ws.send(msg);
            input.value = '';
        }
    }
});

connect();
</script>
</body>
</html>
"#;

/// Render the chat page with the palette embedded as a JavaScript array.
pub fn render() -> String {
    let names: Vec<String> = PALETTE
        .iter()
        .map(|c| format!("'{}'", c.css_name()))
        .collect();
    TEMPLATE.replace(PALETTE_PLACEHOLDER, &format!("[{}]", names.join(", ")))
}
