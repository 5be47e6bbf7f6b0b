//! Build script for wopr-kiosk
//!
//! Validates the bundled kiosk.toml at compile time, since it is embedded
//! into the binary as the fallback configuration.

use std::fs;
use std::path::Path;

#[path = "build_support.rs"]
mod build_support;

use build_support::format_error_lines;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build_support.rs");
    validate_config();
}

/// Validate kiosk.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=kiosk.toml");

    let config_path = Path::new("kiosk.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read kiosk.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in kiosk.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    validate_sources(&config, &mut errors);
    validate_windows(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: kiosk.toml validation failed                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }
}

/// Every [[source]] needs a unique name and a positive interval
fn validate_sources(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(sources) = config.get("source").and_then(toml::Value::as_array) else {
        errors.push("Missing [[source]] entries - at least one source is required".into());
        return;
    };

    let mut names: Vec<&str> = Vec::new();
    for (i, source) in sources.iter().enumerate() {
        let name = source.get("name").and_then(toml::Value::as_str);
        match name {
            Some(name) if !name.is_empty() => {
                if names.contains(&name) {
                    errors.push(format!("Duplicate source name '{}'", name));
                }
                names.push(name);
            }
            _ => errors.push(format!("Source #{} has no name", i + 1)),
        }

        match source.get("interval_s").and_then(toml::Value::as_integer) {
            Some(secs) if secs > 0 => {}
            _ => errors.push(format!(
                "Source '{}' needs a positive interval_s",
                name.unwrap_or("?")
            )),
        }
    }
}

/// Windows must be HH:MM strings
fn validate_windows(config: &toml::Value, errors: &mut Vec<String>) {
    let windows = config
        .get("power")
        .and_then(|p| p.get("window"))
        .and_then(toml::Value::as_array);

    for window in windows.into_iter().flatten() {
        for key in ["start", "end"] {
            let value = window.get(key).and_then(toml::Value::as_str);
            let valid = value.is_some_and(|v| {
                v.split_once(':').is_some_and(|(h, m)| {
                    matches!(h.parse::<u8>(), Ok(h) if h < 24)
                        && matches!(m.parse::<u8>(), Ok(m) if m < 60)
                })
            });
            if !valid {
                errors.push(format!("Window {} '{}' is not HH:MM", key, value.unwrap_or("")));
            }
        }
    }
}
