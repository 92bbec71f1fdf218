//! Language tagging by filename first, then extension.
//!
//! Grounded in `legacy_src/analysis/complexity.rs::is_code_file` and
//! `legacy_src/analysis/scanner.rs::is_likely_text_file`'s extension
//! tables, extended with the filename-first step spec.md names
//! (`Dockerfile`, `Makefile`, ...).

use std::path::Path;

/// Tag a file path with a language name, or "" if unknown.
pub fn detect(path: &str) -> String {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if let Some(lang) = by_filename(file_name) {
        return lang.to_string();
    }

    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("rs") => "rust",
        Some("go") => "go",
        Some("py") => "python",
        Some("rb") => "ruby",
        Some("js" | "mjs" | "cjs") => "javascript",
        Some("jsx") => "javascript",
        Some("ts" | "mts" | "cts") => "typescript",
        Some("tsx") => "typescript",
        Some("java") => "java",
        Some("kt" | "kts") => "kotlin",
        Some("cs") => "csharp",
        Some("c" | "h") => "c",
        Some("cpp" | "cc" | "cxx" | "hpp") => "cpp",
        Some("php") => "php",
        Some("swift") => "swift",
        Some("scala") => "scala",
        Some("sh" | "bash" | "zsh") => "shell",
        Some("sql") => "sql",
        Some("yaml" | "yml") => "yaml",
        Some("json") => "json",
        Some("toml") => "toml",
        Some("md" | "markdown") => "markdown",
        Some("html" | "htm") => "html",
        Some("css" | "scss" | "sass" | "less") => "css",
        Some("vue") => "vue",
        Some("svelte") => "svelte",
        _ => "",
    }
    .to_string()
}

fn by_filename(name: &str) -> Option<&'static str> {
    match name {
        "Dockerfile" | "Dockerfile.dev" | "Dockerfile.prod" => Some("dockerfile"),
        "Makefile" | "makefile" | "GNUmakefile" => Some("makefile"),
        "Gemfile" | "Gemfile.lock" => Some("ruby"),
        "Rakefile" => Some("ruby"),
        "go.mod" | "go.sum" => Some("go"),
        "Cargo.toml" | "Cargo.lock" => Some("toml"),
        "package.json" | "package-lock.json" => Some("json"),
        "requirements.txt" => Some("python"),
        _ => None,
    }
}
