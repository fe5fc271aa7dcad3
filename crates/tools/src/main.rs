use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const TOKEN_PLACEHOLDER: &str = "token";
const API_URL_PLACEHOLDER: &str = "http://localhost:3000/api";

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    // envsub <template> <output>
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        return Err(usage());
    }

    let template = PathBuf::from(&args[1]);
    let output = PathBuf::from(&args[2]);

    let mapbox = env::var("MAPBOX").unwrap_or_else(|_| TOKEN_PLACEHOLDER.to_string());
    let api_url = env::var("URL_CONNECTION").unwrap_or_else(|_| API_URL_PLACEHOLDER.to_string());

    run(&template, &output, &mapbox, &api_url)
}

fn run(template: &Path, output: &Path, mapbox: &str, api_url: &str) -> Result<(), String> {
    let text = fs::read_to_string(template).map_err(|e| format!("read {template:?}: {e}"))?;
    let substituted = substitute(&text, mapbox, api_url);
    fs::write(output, substituted).map_err(|e| format!("write {output:?}: {e}"))?;
    fs::remove_file(template).map_err(|e| format!("remove {template:?}: {e}"))?;
    eprintln!("wrote {}", output.display());
    Ok(())
}

/// Plain textual replacement: every occurrence of the placeholder words is
/// rewritten. That is the documented contract of this build step, so values
/// containing a placeholder as a substring are rewritten too.
fn substitute(text: &str, mapbox: &str, api_url: &str) -> String {
    text.replace(TOKEN_PLACEHOLDER, mapbox)
        .replace(API_URL_PLACEHOLDER, api_url)
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "envsub".to_string());
    format!(
        "Usage:\n  {exe} <template> <output>\n\nNotes:\n- Replaces the literal `token` with $MAPBOX and the literal `http://localhost:3000/api` with $URL_CONNECTION.\n- The template file is removed once the output is written.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::{run, substitute};
    use std::fs;

    const TEMPLATE: &str = "urlConnection = \"http://localhost:3000/api\"\nmapBoxToken = \"token\"\n";

    #[test]
    fn substitutes_every_placeholder_occurrence() {
        let text = "token http://localhost:3000/api token";
        let out = substitute(text, "pk.abc123", "https://points.example.com/api");
        assert_eq!(out, "pk.abc123 https://points.example.com/api pk.abc123");
    }

    #[test]
    fn unset_values_leave_the_placeholders_in_place() {
        let out = substitute(TEMPLATE, "token", "http://localhost:3000/api");
        assert_eq!(out, TEMPLATE);
    }

    #[test]
    fn run_writes_the_output_and_removes_the_template() {
        let dir = tempfile::tempdir().expect("tempdir");
        let template = dir.path().join("settings.example.toml");
        let output = dir.path().join("settings.toml");
        fs::write(&template, TEMPLATE).expect("write template");

        run(&template, &output, "pk.abc123", "https://points.example.com/api").expect("run");

        let written = fs::read_to_string(&output).expect("read output");
        assert!(written.contains("mapBoxToken = \"pk.abc123\""));
        assert!(written.contains("urlConnection = \"https://points.example.com/api\""));
        assert!(!template.exists());
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = run(
            &dir.path().join("absent.toml"),
            &dir.path().join("out.toml"),
            "pk.abc123",
            "https://points.example.com/api",
        )
        .expect_err("must fail");
        assert!(err.contains("read"));
    }
}
