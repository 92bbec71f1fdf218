//! Fixed system/user prompt templates for the three review passes. Each
//! pass is a pure string template; the diff context built by [`super::context`]
//! is interpolated into the user message.

use crate::diff::model::Category;

pub struct Prompt {
    pub category: Category,
    pub system: &'static str,
    pub user_preamble: &'static str,
}

const JSON_CONTRACT: &str = r#"Respond with a single JSON object and nothing else, in this exact shape:
{"findings": [{"file": "path", "line": 0, "severity": "critical|high|medium|low|info", "title": "short title", "description": "what's wrong and why", "suggestion": "how to fix it"}]}
If there is nothing to report, respond with {"findings": []}. Do not wrap the JSON in prose."#;

pub fn semantic() -> Prompt {
    Prompt {
        category: Category::Logic,
        system: "You are a senior engineer reviewing a code change for semantic correctness: \
            does the change do what its description claims, are there mismatches between \
            intent and implementation, and are there subtle behavioral regressions a compiler \
            and linter would not catch.",
        user_preamble: "Review the following diff for semantic correctness issues.",
    }
}

pub fn logic() -> Prompt {
    Prompt {
        category: Category::Logic,
        system: "You are a senior engineer reviewing a code change for logic errors: off-by-one \
            mistakes, incorrect boundary conditions, inverted conditionals, unhandled edge cases, \
            and race conditions in concurrent code.",
        user_preamble: "Review the following diff for logic errors.",
    }
}

pub fn convention() -> Prompt {
    Prompt {
        category: Category::Convention,
        system: "You are a senior engineer reviewing a code change for convention and style \
            consistency: naming, idiomatic use of the language's standard patterns, and \
            consistency with the rest of the codebase visible in the diff.",
        user_preamble: "Review the following diff for convention and style issues.",
    }
}

pub fn render_user_message(prompt: &Prompt, context: &str) -> String {
    format!("{}\n\n{}\n\n{}", prompt.user_preamble, JSON_CONTRACT, context)
}
