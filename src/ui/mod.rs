//! Web UI.
//!
//! A small axum app that renders the tool menu as tabs, generates an input
//! form for each tool from its schema, and renders the normalized payloads:
//! tables as HTML tables, track series as inline SVG, everything else as
//! pretty-printed JSON. Errors render in place of the result, never as an
//! HTTP failure.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    response::Html,
    routing::get,
    Router,
};
use http::StatusCode;
use serde_json::{json, Value};

use crate::mcp::{Tool, ToolCategory, ToolRegistry};
use crate::normalize::{DataTable, TrackSeries};

mod svg;

/// Shared state for UI handlers.
#[derive(Clone)]
pub struct UiState {
    pub registry: Arc<ToolRegistry>,
}

/// Build the UI router.
pub fn build_router(registry: Arc<ToolRegistry>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/tools/{name}", get(tool_form).post(tool_execute))
        .with_state(UiState { registry })
}

/// Serve the UI until the process is stopped.
pub async fn serve(registry: Arc<ToolRegistry>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("web UI listening on http://{}", addr);
    axum::serve(listener, build_router(registry)).await
}

async fn index(State(state): State<UiState>) -> Html<String> {
    let mut body = String::new();
    for category in [ToolCategory::Historical, ToolCategory::Live] {
        body.push_str(&format!("<section><h2>{} data</h2><ul>", category.name()));
        for tool in state.registry.by_category(category) {
            body.push_str(&format!(
                r#"<li><a href="/tools/{name}">{name}</a> &mdash; {desc}</li>"#,
                name = escape(&tool.name),
                desc = escape(&tool.description),
            ));
        }
        body.push_str("</ul></section>");
    }
    Html(page("F1 Statistics", &body))
}

async fn tool_form(
    State(state): State<UiState>,
    Path(name): Path<String>,
) -> (StatusCode, Html<String>) {
    match state.registry.get(&name) {
        Some(tool) => (
            StatusCode::OK,
            Html(page(&tool.name, &render_form(tool, None))),
        ),
        None => not_found(&name),
    }
}

async fn tool_execute(
    State(state): State<UiState>,
    Path(name): Path<String>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let tool = match state.registry.get(&name) {
        Some(tool) => tool.clone(),
        None => return not_found(&name),
    };

    let args = coerce_form_args(&fields, &tool.input_schema);
    let payload = match state.registry.execute(&name, args).await {
        Ok(payload) => payload,
        Err(e) => json!({"error": {"kind": e.kind(), "message": e.to_string()}}),
    };

    let mut body = render_form(&tool, Some(&fields));
    body.push_str(&render_payload(&payload));
    (StatusCode::OK, Html(page(&tool.name, &body)))
}

fn not_found(name: &str) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(page(
            "Not found",
            &format!("<p>No tool named {}</p>", escape(name)),
        )),
    )
}

/// Convert form fields to typed JSON arguments per the tool schema. Empty
/// fields are omitted; the `filters` object field accepts a JSON object.
fn coerce_form_args(fields: &HashMap<String, String>, schema: &Value) -> Value {
    let mut args = serde_json::Map::new();
    let properties = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .cloned()
        .unwrap_or_default();

    for (key, raw) in fields {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let declared = properties
            .get(key)
            .and_then(|s| s.get("type"))
            .and_then(|t| t.as_str());
        let value = match declared {
            Some("integer") => raw
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            Some("number") => raw
                .parse::<f64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            Some("boolean") => Value::Bool(raw.eq_ignore_ascii_case("true") || raw == "on"),
            Some("object") => {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            }
            _ => Value::String(raw.to_string()),
        };
        args.insert(key.clone(), value);
    }
    Value::Object(args)
}

/// Render the input form for a tool, pre-filled with prior values.
fn render_form(tool: &Tool, prior: Option<&HashMap<String, String>>) -> String {
    let mut body = format!(
        r#"<p><a href="/">&larr; all tools</a></p><h2>{}</h2><p>{}</p><form method="post">"#,
        escape(&tool.name),
        escape(&tool.description),
    );

    let empty = serde_json::Map::new();
    let properties = tool
        .input_schema
        .get("properties")
        .and_then(|p| p.as_object())
        .unwrap_or(&empty);
    let required: Vec<&str> = tool
        .input_schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|r| r.iter().filter_map(|k| k.as_str()).collect())
        .unwrap_or_default();

    for (key, spec) in properties {
        let label = match required.contains(&key.as_str()) {
            true => format!("{} *", key),
            false => key.clone(),
        };
        let value = prior
            .and_then(|p| p.get(key))
            .map(|v| escape(v))
            .unwrap_or_default();
        let hint = spec
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("");

        body.push_str(&format!("<label>{}<br>", escape(&label)));
        if let Some(options) = spec.get("enum").and_then(|e| e.as_array()) {
            body.push_str(&format!(r#"<select name="{}">"#, escape(key)));
            body.push_str("<option value=\"\"></option>");
            for option in options.iter().filter_map(|o| o.as_str()) {
                let selected = if value == option { " selected" } else { "" };
                body.push_str(&format!(
                    r#"<option value="{0}"{1}>{0}</option>"#,
                    escape(option),
                    selected
                ));
            }
            body.push_str("</select>");
        } else {
            body.push_str(&format!(
                r#"<input name="{}" value="{}" placeholder="{}">"#,
                escape(key),
                value,
                escape(hint),
            ));
        }
        body.push_str("</label><br>");
    }

    body.push_str(r#"<button type="submit">Run</button></form>"#);
    body
}

/// Render a normalized tool payload as HTML.
fn render_payload(payload: &Value) -> String {
    if let Some(error) = payload.get("error") {
        let kind = error.get("kind").and_then(|k| k.as_str()).unwrap_or("error");
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return format!(
            r#"<div class="error"><strong>{}</strong>: {}</div>"#,
            escape(kind),
            escape(message)
        );
    }

    match payload.get("type").and_then(|t| t.as_str()) {
        Some("table") => payload
            .get("table")
            .and_then(|t| serde_json::from_value::<DataTable>(t.clone()).ok())
            .map(|table| render_table(&table))
            .unwrap_or_else(|| render_json(payload)),
        Some("series") => payload
            .get("series")
            .and_then(|s| serde_json::from_value::<TrackSeries>(s.clone()).ok())
            .map(|series| svg::render_track(&series))
            .unwrap_or_else(|| render_json(payload)),
        Some("text") => {
            let text = payload.get("text").and_then(|t| t.as_str()).unwrap_or("");
            format!("<pre>{}</pre>", escape(text))
        }
        _ => render_json(payload),
    }
}

fn render_table(table: &DataTable) -> String {
    let mut html = format!("<h3>{}</h3>", escape(&table.title));
    if table.is_empty() {
        html.push_str("<p>No rows.</p>");
        return html;
    }
    html.push_str("<table><thead><tr>");
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn render_json(payload: &Value) -> String {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    format!("<pre>{}</pre>", escape(&pretty))
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; }}
table {{ border-collapse: collapse; margin-top: 1rem; }}
th, td {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
th {{ background: #f3f3f3; }}
input, select {{ margin: 0.2rem 0 0.6rem; padding: 0.3rem; min-width: 18rem; }}
.error {{ background: #fdecea; border: 1px solid #d93025; padding: 0.6rem 1rem; margin-top: 1rem; }}
</style>
</head>
<body>
<h1><a href="/" style="text-decoration:none;color:inherit">F1 Statistics</a></h1>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body,
    )
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DataOrigin;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>&\"x\""), "&lt;b&gt;&amp;&quot;x&quot;");
    }

    #[test]
    fn test_coerce_form_args() {
        let schema = json!({
            "type": "object",
            "properties": {
                "year": {"type": "integer"},
                "round": {"type": "string"},
                "filters": {"type": "object"},
            }
        });
        let mut fields = HashMap::new();
        fields.insert("year".to_string(), "2024".to_string());
        fields.insert("round".to_string(), "Monaco".to_string());
        fields.insert("filters".to_string(), r#"{"session_key": "latest"}"#.to_string());
        fields.insert("unused".to_string(), "".to_string());

        let args = coerce_form_args(&fields, &schema);
        assert_eq!(args["year"], 2024);
        assert_eq!(args["round"], "Monaco");
        assert_eq!(args["filters"]["session_key"], "latest");
        assert!(args.get("unused").is_none());
    }

    #[test]
    fn test_render_error_payload() {
        let payload = json!({"error": {"kind": "not_found", "message": "no 2024 event matching 'xyz'"}});
        let html = render_payload(&payload);
        assert!(html.contains("not_found"));
        assert!(html.contains("class=\"error\""));
    }

    #[test]
    fn test_render_table_payload() {
        let table = DataTable {
            origin: DataOrigin::Historical,
            title: "2024 season calendar".into(),
            columns: vec!["Round".into(), "Event".into()],
            rows: vec![vec!["7".into(), "Monaco Grand Prix".into()]],
        };
        let payload = json!({"type": "table", "table": table});
        let html = render_payload(&payload);
        assert!(html.contains("<table>"));
        assert!(html.contains("Monaco Grand Prix"));
    }
}
