use std::fmt;
use ar_core::{Result, RewriteModel, RewriteRequest};

const OVERVIEW_CHARS: usize = 200;

/// Deterministic rewrite used whenever the generative service is absent or
/// failing. Same input always yields the same output.
#[derive(Clone, Copy, Default)]
pub struct TemplateModel;

impl fmt::Debug for TemplateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateModel").finish()
    }
}

impl TemplateModel {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, title: &str, content: &str) -> String {
        let overview: String = content.chars().take(OVERVIEW_CHARS).collect();
        let topic = title.to_lowercase();

        format!(
            "# {title}

## Overview
{overview}...

## Key Insights
This article explores important aspects of {topic}. The content has been structured for better readability and SEO performance.

## Detailed Analysis
{content}

## Conclusion
Understanding {topic} is crucial in today's digital landscape. By implementing these insights, businesses can achieve better results and improved customer satisfaction.

## Further Reading
The insights in this article are inspired by industry-leading resources and best practices in the field.

---
*This article has been optimized for SEO and readability.*"
        )
    }
}

#[async_trait::async_trait]
impl RewriteModel for TemplateModel {
    fn name(&self) -> &str {
        "Template"
    }

    async fn rewrite(&self, request: &RewriteRequest<'_>) -> Result<String> {
        Ok(self.render(request.title, request.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_template_model() {
        let model = TemplateModel::new();
        let references = vec!["Reference body".to_string()];
        let request = RewriteRequest {
            title: "Chatbot Best Practices",
            content: "Implementing a chatbot requires careful planning and strategy.",
            references: &references,
        };

        let result = model.rewrite(&request).await.unwrap();
        assert!(result.starts_with("# Chatbot Best Practices\n"));
        for heading in [
            "## Overview",
            "## Key Insights",
            "## Detailed Analysis",
            "## Conclusion",
            "## Further Reading",
        ] {
            assert!(result.contains(heading), "missing {}", heading);
        }
        assert!(result.contains("important aspects of chatbot best practices."));
        assert!(result.ends_with("*This article has been optimized for SEO and readability.*"));
    }

    #[test]
    fn test_overview_truncates_to_200_chars() {
        let model = TemplateModel::new();
        let content = "é".repeat(300);
        let result = model.render("Title", &content);

        let expected_overview = format!("## Overview\n{}...\n", "é".repeat(200));
        assert!(result.contains(&expected_overview));
        assert!(result.contains(&format!("## Detailed Analysis\n{}\n", content)));
    }

    #[test]
    fn test_render_is_deterministic() {
        let model = TemplateModel::new();
        assert_eq!(
            model.render("Same", "Same body"),
            model.render("Same", "Same body")
        );
    }
}
