use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::error;

use crate::model::generation::GenerationRequest;

pub const DEFAULT_AUDIENCE: &str = "general readers";
pub const DEFAULT_TONE: &str = "informative and friendly";

const BLOG_TEMPLATE_NAME: &str = "blog_post.txt";

// No trailing newline: the prompt ends at the outline, or after the blank line
// following the requirements when there is none.
const BLOG_TEMPLATE: &str = r#"You are a professional blogger.
Write a well-structured, engaging blog post of approximately {{ words }} words.
Topic: {{ topic }}
Intended audience: {{ audience }}
Desired tone/style: {{ tone }}
If an outline is provided, follow it closely.

Requirements:
- Use clear headings (H1, H2, H3), short paragraphs, and bullet lists where helpful.
- Include an introduction, 4–6 main sections, and a conclusion.
- Avoid fluff, ensure factual accuracy, and keep the flow natural.
- Use Markdown formatting only (no HTML tags).
- Do NOT include a preface like "Here is the blog post"; output ONLY the blog content.

{% if outline %}Outline:
{{ outline }}{% endif %}"#;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(Serialize)]
struct BlogPromptContext<'a> {
    topic: &'a str,
    audience: &'a str,
    tone: &'a str,
    outline: Option<&'a str>,
    words: u32,
}

fn template_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        if let Err(err) = env.add_template(BLOG_TEMPLATE_NAME, BLOG_TEMPLATE) {
            error!(?err, "blog prompt template failed to compile");
        }
        env
    })
}

/// Renders the instruction prompt for one blog post.
pub fn build_blog_prompt(req: &GenerationRequest) -> Result<String, minijinja::Error> {
    let ctx = BlogPromptContext {
        topic: &req.topic,
        audience: req.audience.as_deref().unwrap_or(DEFAULT_AUDIENCE),
        tone: req.tone.as_deref().unwrap_or(DEFAULT_TONE),
        outline: req.outline.as_deref().filter(|o| !o.is_empty()),
        words: req.words,
    };

    template_env().get_template(BLOG_TEMPLATE_NAME)?.render(ctx)
}
