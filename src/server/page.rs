//! HTML page served on mount.

use crate::widget::escape_html;

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chatbot dos Centros de Saúde">
    <title>{title}</title>
    <script src="https://unpkg.com/htmx.org@2.0.8"></script>
    <style>
        body {{ margin: 0; font-family: system-ui, sans-serif; background: #f4f6f8; }}
        .chat-container {{ max-width: 720px; margin: 2rem auto; background: #fff; border-radius: 16px; box-shadow: 0 2px 12px rgba(0,0,0,.08); display: flex; flex-direction: column; height: calc(100vh - 4rem); }}
        .chat-header {{ padding: 1rem 1.5rem; border-bottom: 1px solid #e5e7eb; font-weight: 600; }}
        #chat-box {{ flex: 1; overflow-y: auto; padding: 1rem 1.5rem; }}
        .message {{ max-width: 80%; margin: .5rem 0; padding: .6rem .9rem; border-radius: 12px; }}
        .message.user {{ margin-left: auto; background: #2563eb; color: #fff; }}
        .message.bot {{ background: #eef2f7; }}
        .message-time {{ font-size: .7rem; opacity: .7; margin-top: .25rem; text-align: right; }}
        .typing-dots span {{ display: inline-block; width: 6px; height: 6px; margin: 0 2px; border-radius: 50%; background: #94a3b8; animation: blink 1.2s infinite; }}
        .typing-dots span:nth-child(2) {{ animation-delay: .2s; }}
        .typing-dots span:nth-child(3) {{ animation-delay: .4s; }}
        @keyframes blink {{ 0%, 80%, 100% {{ opacity: .2; }} 40% {{ opacity: 1; }} }}
        #chat-form {{ display: flex; gap: .5rem; padding: 1rem 1.5rem; border-top: 1px solid #e5e7eb; }}
        #user-input {{ flex: 1; resize: none; padding: .6rem .8rem; border-radius: 10px; border: 1px solid #cbd5e1; font: inherit; }}
        #chat-form button {{ padding: 0 1.2rem; border: 0; border-radius: 10px; background: #2563eb; color: #fff; font: inherit; cursor: pointer; }}
    </style>
</head>
<body>
    {content}
</body>
</html>"#
    )
}

/// Chat page content for the widget mounted as `widget_id`.
pub fn chat_content(widget_id: &str) -> String {
    format!(
        r##"<div class="chat-container">
        <header class="chat-header">Centros de Saúde BH</header>

        <div id="chat-box" aria-live="polite" aria-label="Mensagens"></div>

        <form
            id="chat-form"
            hx-post="/widget/{widget_id}/submit"
            hx-trigger="submit, keydown[key=='Enter'&&!shiftKey] from:#user-input"
            hx-target="#chat-box"
            hx-swap="beforeend scroll:bottom"
            hx-on::after-request="if (event.detail.xhr.status === 200) this.reset()"
        >
            <textarea
                id="user-input"
                name="message"
                rows="1"
                placeholder="Digite sua mensagem..."
                onkeydown="if (event.key === 'Enter' && !event.shiftKey) event.preventDefault()"
                autofocus
            ></textarea>
            <button type="submit">Enviar</button>
        </form>
    </div>
    <script>
        window.addEventListener('pagehide', () => navigator.sendBeacon('/widget/{widget_id}/close'));
    </script>"##
    )
}
