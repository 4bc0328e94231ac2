//! Privacy blur over the loaded page.
//!
//! The blur state lives only in the page's inline style of `document.body`.
//! Toggling on saves the current `filter`/`transition`, toggling off puts them
//! back, so two toggles leave the page as it was. A reload clears it.

use tauri::{Runtime, WebviewWindow};

use crate::config::ShellConfig;
use crate::error::ShellResult;

/// Dataset keys used to remember the page's own inline style while blurred.
const SAVED_FILTER_KEY: &str = "shellSavedFilter";
const SAVED_TRANSITION_KEY: &str = "shellSavedTransition";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurSpec {
    pub radius_px: u32,
    pub transition_ms: u32,
}

impl Default for BlurSpec {
    fn default() -> Self {
        Self {
            radius_px: 8,
            transition_ms: 200,
        }
    }
}

impl From<&ShellConfig> for BlurSpec {
    fn from(config: &ShellConfig) -> Self {
        Self {
            radius_px: config.blur_radius_px,
            transition_ms: config.blur_transition_ms,
        }
    }
}

impl BlurSpec {
    /// Filter value that marks the page as blurred.
    pub fn sentinel(&self) -> String {
        format!("blur({}px)", self.radius_px)
    }

    pub fn transition(&self) -> String {
        format!("filter {}ms ease-in-out", self.transition_ms)
    }

    /// Script that flips the blur in the page.
    pub fn toggle_script(&self) -> String {
        format!(
            r#"(function () {{
  var root = document.body;
  if (!root) {{ return; }}
  var data = root.dataset;
  if (root.style.filter === '{sentinel}') {{
    var savedTransition = data.{transition_key} || '';
    root.style.transition = 'none';
    root.style.filter = data.{filter_key} || '';
    delete data.{filter_key};
    delete data.{transition_key};
    requestAnimationFrame(function () {{ root.style.transition = savedTransition; }});
  }} else {{
    data.{filter_key} = root.style.filter;
    data.{transition_key} = root.style.transition;
    root.style.transition = '{transition}';
    root.style.filter = '{sentinel}';
  }}
}})();"#,
            sentinel = self.sentinel(),
            transition = self.transition(),
            filter_key = SAVED_FILTER_KEY,
            transition_key = SAVED_TRANSITION_KEY,
        )
    }
}

/// Flip the blur in `window`'s page.
pub fn toggle<R: Runtime>(window: &WebviewWindow<R>, spec: &BlurSpec) -> ShellResult<()> {
    log::debug!("[PRIVACY] toggling blur ({})", spec.sentinel());
    window.eval(&spec.toggle_script())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_default_spec_matches_config_defaults() {
        assert_eq!(BlurSpec::from(&ShellConfig::default()), BlurSpec::default());
    }

    #[test]
    fn test_sentinel_and_transition() {
        let spec = BlurSpec {
            radius_px: 12,
            transition_ms: 150,
        };
        assert_eq!(spec.sentinel(), "blur(12px)");
        assert_eq!(spec.transition(), "filter 150ms ease-in-out");
    }

    #[test]
    fn test_two_toggles_restore_existing_style() {
        let script = BlurSpec::default().toggle_script();
        let original = StubBody {
            filter: "contrast(1.1)".into(),
            transition: "opacity 1s".into(),
            ..StubBody::default()
        };
        let mut body = original.clone();

        run_toggle(&script, &mut body);
        assert_eq!(body.filter, "blur(8px)");
        assert_eq!(body.transition, "filter 200ms ease-in-out");
        assert_eq!(body.dataset["shellSavedFilter"], "contrast(1.1)");
        assert_eq!(body.dataset["shellSavedTransition"], "opacity 1s");

        let before_frame = run_toggle(&script, &mut body);
        // Transitions are off while the filter comes back, so the unblur is instant.
        assert_eq!(before_frame.transition, "none");
        assert_eq!(before_frame.filter, "contrast(1.1)");
        assert_eq!(body, original);
    }

    #[test]
    fn test_two_toggles_restore_empty_style() {
        let script = BlurSpec {
            radius_px: 12,
            transition_ms: 150,
        }
        .toggle_script();
        let mut body = StubBody::default();

        run_toggle(&script, &mut body);
        assert_eq!(body.filter, "blur(12px)");
        assert_eq!(body.transition, "filter 150ms ease-in-out");

        run_toggle(&script, &mut body);
        assert_eq!(body, StubBody::default());
    }

    #[test]
    fn test_page_blur_of_other_radius_is_saved_not_cleared() {
        let script = BlurSpec::default().toggle_script();
        let mut body = StubBody {
            filter: "blur(2px)".into(),
            ..StubBody::default()
        };

        run_toggle(&script, &mut body);
        assert_eq!(body.filter, "blur(8px)");
        run_toggle(&script, &mut body);
        assert_eq!(body.filter, "blur(2px)");
    }

    /// Inline style and dataset of `document.body`.
    #[derive(Debug, Clone, Default, PartialEq)]
    struct StubBody {
        filter: String,
        transition: String,
        dataset: BTreeMap<String, String>,
    }

    const PRELUDE: [&str; 4] = [
        "(function () {",
        "var root = document.body;",
        "if (!root) { return; }",
        "var data = root.dataset;",
    ];

    /// Execute the toggle script's statements against `body`, then run the
    /// queued animation frame. Returns the state before that frame ran.
    /// Any statement shape the walker does not know fails the test.
    fn run_toggle(script: &str, body: &mut StubBody) -> StubBody {
        let lines: Vec<&str> = script.lines().map(str::trim).collect();
        let check_at = lines
            .iter()
            .position(|l| l.starts_with("if (root.style.filter === "))
            .expect("blur check");
        let else_at = lines.iter().position(|l| *l == "} else {").expect("else");
        let end_at = else_at + lines[else_at..].iter().position(|l| *l == "}").expect("end");

        for line in &lines[..check_at] {
            assert!(PRELUDE.contains(line), "unexpected statement {line:?}");
        }
        assert_eq!(lines[end_at + 1..], ["})();"]);

        let sentinel = lines[check_at]
            .trim_start_matches("if (root.style.filter === ")
            .trim_end_matches(") {");
        let branch = if body.filter == eval(sentinel, body, &HashMap::new()) {
            &lines[check_at + 1..else_at]
        } else {
            &lines[else_at + 1..end_at]
        };

        let mut locals = HashMap::new();
        let mut frame = Vec::new();
        for stmt in branch {
            exec(stmt, body, &mut locals, &mut frame);
        }
        let before_frame = body.clone();
        for stmt in frame {
            exec(&stmt, body, &mut locals, &mut Vec::new());
        }
        before_frame
    }

    fn exec(
        stmt: &str,
        body: &mut StubBody,
        locals: &mut HashMap<String, String>,
        frame: &mut Vec<String>,
    ) {
        if let Some(inner) = stmt
            .strip_prefix("requestAnimationFrame(function () { ")
            .and_then(|s| s.strip_suffix(" });"))
        {
            frame.push(inner.to_string());
            return;
        }
        if let Some(key) = stmt
            .strip_prefix("delete data.")
            .and_then(|s| s.strip_suffix(';'))
        {
            body.dataset.remove(key);
            return;
        }

        let assignment = stmt
            .strip_suffix(';')
            .unwrap_or_else(|| panic!("unsupported statement {stmt:?}"));
        let (target, expr) = assignment
            .split_once(" = ")
            .unwrap_or_else(|| panic!("unsupported statement {stmt:?}"));
        let value = eval(expr, body, locals);

        if let Some(name) = target.strip_prefix("var ") {
            locals.insert(name.to_string(), value);
        } else if let Some(key) = target.strip_prefix("data.") {
            body.dataset.insert(key.to_string(), value);
        } else {
            match target {
                "root.style.filter" => body.filter = value,
                "root.style.transition" => body.transition = value,
                other => panic!("unsupported assignment target {other:?}"),
            }
        }
    }

    fn eval(expr: &str, body: &StubBody, locals: &HashMap<String, String>) -> String {
        if let Some(literal) = expr.strip_prefix('\'').and_then(|e| e.strip_suffix('\'')) {
            return literal.to_string();
        }
        if let Some(key) = expr
            .strip_prefix("data.")
            .and_then(|e| e.strip_suffix(" || ''"))
        {
            return body.dataset.get(key).cloned().unwrap_or_default();
        }
        match expr {
            "root.style.filter" => body.filter.clone(),
            "root.style.transition" => body.transition.clone(),
            name => locals
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("unknown expression {name:?}")),
        }
    }

    #[test]
    fn test_script_is_self_contained() {
        let script = BlurSpec::default().toggle_script();
        assert!(script.starts_with("(function () {"));
        assert!(script.trim_end().ends_with("})();"));
        assert!(script.contains("if (!root) { return; }"));
    }
}
