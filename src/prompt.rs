//! Instruction text for the generative endpoint.

/// System instruction sent ahead of every prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a precise news aggregation engine. Return only JSON that matches the schema.";

/// How many items to request per feed section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCounts {
    pub top_stories: usize,
    pub river_of_news: usize,
    pub quick_links: usize,
    pub trending_topics: usize,
}

/// Build the user prompt for `topic`.
///
/// Deterministic: the same topic and counts always produce the same text.
pub fn build_prompt(topic: &str, counts: ItemCounts) -> String {
    format!(
        r#"Perform a comprehensive web search for the latest news on the topic: "{topic}".

STRICT REQUIREMENTS:
1. Use ONLY actual, verified URLs found in your search results. DO NOT invent or guess URLs.
2. Prioritize breaking news and articles from the last 24-72 hours.
3. Ensure every "source" name matches the actual publication found in the search results.

Structure the response as a JSON object with this format:
- "topic": The exact search topic.
- "topStories": {top} major stories. Each must have:
   - "id": A unique string.
   - "title": The actual headline or a very close summary.
   - "summary": 1-2 short sentences of context (<= 220 chars).
   - "source": The publisher name (e.g., "The Verge", "Reuters").
   - "url": The exact valid link to the article.
   - "timestamp": A relative time string (e.g., "2 hours ago").
   - "relatedSources": 2-4 other real links/sources reporting on the same story. Keep snippets <= 140 chars.
- "riverOfNews": {river} shorter, recent news items with title, source, and valid URL.
- "sidebar":
   - "quickLinks": {links} links to deep-dive analysis or official pages.
   - "trendingTopics": {trending} related search terms for navigation.
If you cannot find enough results, expand the search query, but still return the exact counts above.
Return a single JSON object only. Do not include markdown, code fences, or trailing text.
"#,
        top = counts.top_stories,
        river = counts.river_of_news,
        links = counts.quick_links,
        trending = counts.trending_topics,
    )
}
