//! Small idempotent text edits used by installer steps.

/// What [`ensure_line`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// The line was inserted; holds the new text.
    Inserted(String),
    /// The text already contains the line.
    Present,
    /// The anchor text was not found.
    AnchorNotFound,
}

/// Insert `line` directly after the first occurrence of `after`, unless
/// `text` already contains `line`.
pub fn ensure_line(text: &str, after: &str, line: &str) -> LineEdit {
    if text.contains(line) {
        return LineEdit::Present;
    }
    match text.find(after) {
        Some(start) => {
            let split = start + after.len();
            let mut out = String::with_capacity(text.len() + line.len());
            out.push_str(&text[..split]);
            out.push_str(line);
            out.push_str(&text[split..]);
            LineEdit::Inserted(out)
        }
        None => LineEdit::AnchorNotFound,
    }
}

/// Whether an env file declares `name` (as `NAME=` or `export NAME=`).
pub fn declares_env_var(text: &str, name: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim_start();
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);
        line.strip_prefix(name)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}

/// Append an empty `NAME=` declaration for every variable in `vars` that
/// `text` does not declare yet. Returns `text` unchanged when nothing is
/// missing.
pub fn ensure_env_vars(text: &str, vars: &[String]) -> String {
    let mut missing: Vec<&str> = Vec::new();
    for var in vars {
        if !declares_env_var(text, var) && !missing.contains(&var.as_str()) {
            missing.push(var);
        }
    }
    if missing.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    if !out.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push('\n');
    }
    for var in missing {
        out.push_str(var);
        out.push_str("=\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "'providers' => [\n        App\\Providers\\RouteServiceProvider::class,\n    ],\n";

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_ensure_line_inserts_after_anchor() {
        let edit = ensure_line(
            CONFIG,
            "RouteServiceProvider::class,\n",
            "        App\\Providers\\SparkServiceProvider::class,\n",
        );
        assert_eq!(
            edit,
            LineEdit::Inserted(
                "'providers' => [\n        App\\Providers\\RouteServiceProvider::class,\n        App\\Providers\\SparkServiceProvider::class,\n    ],\n"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_ensure_line_is_idempotent() {
        let line = "        App\\Providers\\SparkServiceProvider::class,\n";
        let LineEdit::Inserted(once) = ensure_line(CONFIG, "RouteServiceProvider::class,\n", line) else {
            panic!("expected insertion");
        };
        assert_eq!(ensure_line(&once, "RouteServiceProvider::class,\n", line), LineEdit::Present);
    }

    #[test]
    fn test_ensure_line_missing_anchor() {
        assert_eq!(ensure_line(CONFIG, "NoSuchProvider", "x\n"), LineEdit::AnchorNotFound);
    }

    #[test]
    fn test_declares_env_var() {
        let env = "APP_KEY=base64:abc\n  export STRIPE_KEY = pk\nSTRIPE_SECRET_OLD=x\n";
        assert!(declares_env_var(env, "APP_KEY"));
        assert!(declares_env_var(env, "STRIPE_KEY"));
        assert!(!declares_env_var(env, "STRIPE_SECRET"));
        assert!(!declares_env_var(env, "APP"));
    }

    #[test]
    fn test_ensure_env_vars_appends_missing_only() {
        let out = ensure_env_vars("APP_KEY=abc\nSTRIPE_KEY=pk", &vars(&["STRIPE_KEY", "STRIPE_SECRET", "AUTHY_KEY"]));
        assert_eq!(out, "APP_KEY=abc\nSTRIPE_KEY=pk\n\nSTRIPE_SECRET=\nAUTHY_KEY=\n");
        assert_eq!(ensure_env_vars(&out, &vars(&["STRIPE_SECRET", "AUTHY_KEY"])), out);
    }

    #[test]
    fn test_ensure_env_vars_on_empty_file() {
        assert_eq!(ensure_env_vars("", &vars(&["A", "B", "A"])), "A=\nB=\n");
    }
}
