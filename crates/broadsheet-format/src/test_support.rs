use broadsheet_types::Article;

pub(crate) fn article(headline: &str) -> Article {
    Article {
        headline: headline.to_string(),
        abstract_text: format!("{headline} abstract"),
        web_url: format!("https://www.nytimes.com/{}.html", headline.to_lowercase()),
        snippet: "snippet".to_string(),
        lead_paragraph: "lead".to_string(),
        pub_date: "2023-07-01T04:00:12+0000".to_string(),
        document_type: "article".to_string(),
        news_desk: "Business".to_string(),
        section_name: "Technology".to_string(),
        type_of_material: "News".to_string(),
        word_count: 500,
        subsection_name: None,
        persons: Some(vec!["Jane Doe".to_string(), "John Roe".to_string()]),
        organizations: None,
    }
}
