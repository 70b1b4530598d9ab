//! Prompt templates for URL ranking and answer generation

/// System prompt asking the model to pick the most relevant URLs
pub fn ranking_preamble(urls: &[&str]) -> String {
    let context = urls.join("\n");
    format!(
        r#"You are a specialized URL retriever assistant for a college website. Your task is to analyze the user's question and return the top 3 URLs from the provided list that best match the query. The list includes URLs for various college resources such as departmental pages, professor profiles, and staff directories.

Your response must be strictly in JSON format as follows:

json
{{"urls": ["<URL1>", "<URL2>", "<URL3>"]}}

Important instructions:
- Focus primarily on retrieving URLs related to college staff and administrative personnel, especially if the question includes keywords such as "staff", "administration", "support staff", or "faculty staff".
- Analyze and expand common college abbreviations found in the question. For example, interpret "cs" as "computer science", "bba" as "Bachelor of Business Administration", etc.
- Use both the expanded forms and the specific keywords in the user's question to filter and rank the relevant URLs from the context.
- Only include URLs that are highly relevant to the user's query.
- If there are fewer than three relevant URLs, return only the available ones.
- Do not include any extra text outside the JSON structure.

URLs:
{context}"#
    )
}

/// System prompt asking the model to answer from the retrieved pages
pub fn answer_preamble(institution: &str, question: &str, context: &str) -> String {
    format!(
        "You are a {institution} AI Assistant. Your task is to answer the user's question using the provided data. \
Ensure that your response is clear, accurate, and directly references the context when relevant. \
If the provided data does not fully address the question, indicate any uncertainties or ask for clarification as needed.\n\n\
Additionally, if the user's input is solely a greeting (for example, 'hello', 'hi', etc.), respond with an appropriate greeting message instead of the usual answer.\n\n\
User question: {question}\n\n\
Data: {context}"
    )
}

/// User turn shared by both requests
pub fn question_prompt(question: &str) -> String {
    format!("User question: {}", question)
}

/// Join page texts into the answer context; missing pages contribute nothing
pub fn render_context(contents: &[Option<&str>]) -> String {
    contents
        .iter()
        .flatten()
        .filter(|text| !text.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_preamble_lists_urls() {
        let preamble = ranking_preamble(&["https://site/a/", "https://site/b/"]);
        assert!(preamble.contains("https://site/a/\nhttps://site/b/"));
        assert!(preamble.contains(r#"{"urls": ["<URL1>", "<URL2>", "<URL3>"]}"#));
    }

    #[test]
    fn test_answer_preamble_mentions_greeting_and_persona() {
        let preamble = answer_preamble("GAC Salem 7", "hello", "");
        assert!(preamble.starts_with("You are a GAC Salem 7 AI Assistant."));
        assert!(preamble.contains("solely a greeting"));
        assert!(preamble.contains("User question: hello"));
    }

    #[test]
    fn test_render_context_skips_missing() {
        let context = render_context(&[Some("Alpha"), None, Some("  "), Some("Beta")]);
        assert_eq!(context, "Alpha\n\n---\n\nBeta");
        assert_eq!(render_context(&[None, None]), "");
        assert_eq!(render_context(&[]), "");
    }
}
