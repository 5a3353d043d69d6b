//! Built-in catalog data served by the mock catalog.

use crate::models::{
    DetailResource, FilterGroup, FilterOption, RelatedResource, Resource, ResourceBuilder,
    ResourceType, Suggestion,
};
use crate::pipeline::filter::matches_query;

/// Summary text returned for every resource by the summary endpoint
pub const AI_SUMMARY: &str = "This research paper presents a comprehensive analysis of machine \
learning applications in natural language processing. The authors demonstrate significant \
improvements in text classification accuracy through the implementation of transformer-based \
architectures. Key findings include enhanced performance on benchmark datasets and novel \
approaches to handling multilingual content. The study contributes valuable insights to the \
field of computational linguistics and provides practical recommendations for future research \
directions.";

/// The search result fixture set
pub fn search_results() -> Vec<Resource> {
    vec![
        ResourceBuilder::new(
            "1",
            "Machine Learning Applications in Healthcare: A Comprehensive Review",
            2023,
            ResourceType::Article,
        )
        .authors(["Smith, J.", "Johnson, M.", "Chen, L."])
        .journal("Journal of Medical AI")
        .description(
            "This comprehensive review examines the latest developments in machine learning \
             applications within healthcare, covering diagnostic imaging, predictive analytics, \
             and personalized treatment approaches.",
        )
        .doi("10.1234/jmai.2023.001")
        .url("https://example.com/paper1")
        .tags(["machine learning", "healthcare", "AI", "medical imaging"])
        .downloads(1247)
        .citations(89)
        .build(),
        ResourceBuilder::new(
            "2",
            "Deep Learning for Computer Vision: Theory and Practice",
            2022,
            ResourceType::Book,
        )
        .authors(["Chen, L.", "Williams, R."])
        .publisher("Academic Press")
        .description(
            "A comprehensive guide to deep learning techniques in computer vision, covering \
             convolutional neural networks, object detection, and image segmentation with \
             practical implementations.",
        )
        .url("https://example.com/book1")
        .tags(["deep learning", "computer vision", "neural networks", "CNN"])
        .downloads(2341)
        .citations(156)
        .build(),
        ResourceBuilder::new(
            "3",
            "Climate Change Impact on Global Food Security: A Multi-Regional Analysis",
            2023,
            ResourceType::Article,
        )
        .authors(["Anderson, K.", "Rodriguez, M."])
        .journal("Environmental Science Today")
        .description(
            "An extensive analysis of how climate change affects food security across different \
             global regions, with implications for policy and agricultural adaptation strategies.",
        )
        .doi("10.1234/est.2023.045")
        .url("https://example.com/paper3")
        .tags(["climate change", "food security", "agriculture", "policy"])
        .downloads(892)
        .citations(67)
        .build(),
        ResourceBuilder::new(
            "4",
            "Quantum Computing Algorithms for Optimization Problems",
            2024,
            ResourceType::Thesis,
        )
        .authors(["Zhang, Y.", "Brown, A.", "Davis, P."])
        .description(
            "This doctoral thesis explores novel quantum computing algorithms designed to solve \
             complex optimization problems, with applications in logistics and financial modeling.",
        )
        .url("https://example.com/thesis1")
        .tags(["quantum computing", "optimization", "algorithms", "QAOA"])
        .downloads(543)
        .citations(23)
        .build(),
        ResourceBuilder::new(
            "5",
            "Artificial Intelligence Ethics in Modern Society",
            2023,
            ResourceType::Book,
        )
        .authors(["Wilson, S.", "Taylor, J."])
        .publisher("Ethics Publications")
        .description(
            "Exploring the ethical implications of artificial intelligence deployment in society, \
             covering bias, privacy, accountability, and the future of human-AI interaction.",
        )
        .url("https://example.com/book2")
        .tags(["AI ethics", "society", "bias", "privacy", "accountability"])
        .downloads(1789)
        .citations(134)
        .build(),
        ResourceBuilder::new(
            "6",
            "Neural Networks for Natural Language Processing: Recent Advances",
            2022,
            ResourceType::Article,
        )
        .authors(["Martinez, C.", "Lee, H.", "Patel, R."])
        .journal("Computational Linguistics Review")
        .description(
            "A survey of recent advances in neural network architectures for natural language \
             processing, including transformers, BERT, and GPT models.",
        )
        .doi("10.1234/clr.2022.078")
        .url("https://example.com/paper6")
        .tags(["NLP", "neural networks", "transformers", "BERT", "GPT"])
        .downloads(2156)
        .citations(198)
        .build(),
    ]
}

/// Search the fixture set; a blank query returns every record
pub fn search_resources(query: &str) -> Vec<Resource> {
    search_results()
        .into_iter()
        .filter(|resource| matches_query(resource, query))
        .collect()
}

/// The detail fixture set
pub fn detail_resources() -> Vec<DetailResource> {
    let mut healthcare = DetailResource::from_resource(
        ResourceBuilder::new(
            "1",
            "Machine Learning Applications in Healthcare: A Comprehensive Review",
            2023,
            ResourceType::Article,
        )
        .authors(["Smith, J.", "Johnson, M.", "Chen, L."])
        .journal("Journal of Medical AI")
        .description(
            "This comprehensive review examines the latest developments in machine learning \
             applications within healthcare, covering diagnostic imaging, predictive analytics, \
             and personalized treatment approaches.",
        )
        .doi("10.1234/jmai.2023.001")
        .url("https://example.com/paper1")
        .tags([
            "machine learning",
            "healthcare",
            "AI",
            "medical imaging",
            "predictive analytics",
        ])
        .downloads(1247)
        .citations(89)
        .build(),
    );
    healthcare.r#abstract = Some(
        "Machine learning (ML) has emerged as a transformative technology in healthcare, offering \
         unprecedented opportunities to improve patient outcomes, reduce costs, and enhance \
         clinical decision-making. This comprehensive review examines the current state of ML \
         applications in healthcare, covering key areas including diagnostic imaging, predictive \
         analytics, and personalized treatment approaches. We analyze over 200 recent studies and \
         present a systematic overview of successful implementations, current challenges, and \
         future directions. Our findings indicate that ML-driven solutions have demonstrated \
         significant improvements in diagnostic accuracy, with some applications achieving \
         performance levels comparable to or exceeding human experts. However, challenges remain \
         in areas such as data privacy, algorithm interpretability, and regulatory compliance. \
         We conclude with recommendations for researchers, clinicians, and policymakers to \
         accelerate the responsible adoption of ML in healthcare settings."
            .to_string(),
    );
    healthcare.keywords = strings(&[
        "artificial intelligence",
        "deep learning",
        "clinical decision support",
        "diagnostic imaging",
        "personalized medicine",
    ]);
    healthcare.pages = Some("125-158".to_string());
    healthcare.volume = Some("15".to_string());
    healthcare.issue = Some("3".to_string());
    healthcare.language = Some("English".to_string());
    healthcare.publication_date = Some("2023-03-15".to_string());
    healthcare.affiliations = strings(&[
        "Stanford University School of Medicine",
        "MIT Computer Science and Artificial Intelligence Laboratory",
        "Johns Hopkins University",
    ]);
    healthcare.references = strings(&[
        "LeCun, Y., Bengio, Y., & Hinton, G. (2015). Deep learning. Nature, 521(7553), 436-444.",
        "Topol, E. J. (2019). High-performance medicine: the convergence of human and artificial intelligence. Nature Medicine, 25(1), 44-56.",
        "Rajkomar, A., Dean, J., & Kohane, I. (2019). Machine learning in medicine. New England Journal of Medicine, 380(14), 1347-1358.",
    ]);
    healthcare.related_resources = vec![
        related(
            "2",
            "Deep Learning for Computer Vision: Theory and Practice",
            "book",
            "Related methodology",
        ),
        related(
            "6",
            "Neural Networks for Natural Language Processing: Recent Advances",
            "article",
            "Complementary techniques",
        ),
    ];

    let mut vision = DetailResource::from_resource(
        ResourceBuilder::new(
            "2",
            "Deep Learning for Computer Vision: Theory and Practice",
            2022,
            ResourceType::Book,
        )
        .authors(["Chen, L.", "Williams, R."])
        .publisher("Academic Press")
        .description(
            "A comprehensive guide to deep learning techniques in computer vision, covering \
             convolutional neural networks, object detection, and image segmentation with \
             practical implementations.",
        )
        .url("https://example.com/book1")
        .tags([
            "deep learning",
            "computer vision",
            "neural networks",
            "CNN",
            "image processing",
        ])
        .downloads(2341)
        .citations(156)
        .build(),
    );
    vision.r#abstract = Some(
        "Computer vision has undergone a revolutionary transformation with the advent of deep \
         learning technologies. This comprehensive textbook provides both theoretical foundations \
         and practical implementation guidance for modern computer vision systems. Starting with \
         fundamental concepts of neural networks and progressing through advanced architectures \
         like convolutional neural networks (CNNs), the book covers essential topics including \
         image classification, object detection, semantic segmentation, and generative models. \
         Each chapter includes hands-on exercises and real-world case studies, making it ideal \
         for both students and practitioners. The book also addresses current challenges such as \
         data efficiency, model interpretability, and deployment considerations for production \
         systems."
            .to_string(),
    );
    vision.keywords = strings(&[
        "convolutional neural networks",
        "object detection",
        "image segmentation",
        "generative adversarial networks",
        "transfer learning",
    ]);
    vision.pages = Some("1-524".to_string());
    vision.isbn = Some("978-0-12-345678-9".to_string());
    vision.language = Some("English".to_string());
    vision.publication_date = Some("2022-09-01".to_string());
    vision.affiliations = strings(&["University of California, Berkeley", "Google Research"]);
    vision.related_resources = vec![
        related(
            "1",
            "Machine Learning Applications in Healthcare: A Comprehensive Review",
            "article",
            "Application domain",
        ),
        related(
            "6",
            "Neural Networks for Natural Language Processing: Recent Advances",
            "article",
            "Related architecture",
        ),
    ];

    vec![healthcare, vision]
}

/// Look up a detail record by id
pub fn detail_resource(id: &str) -> Option<DetailResource> {
    detail_resources().into_iter().find(|detail| detail.id() == id)
}

/// The typeahead suggestion database
#[rustfmt::skip]
pub fn suggestion_records() -> Vec<Suggestion> {
    use ResourceType::{Article, Book, Thesis};

    vec![
        suggestion("1", "Machine Learning Applications in Healthcare: A Comprehensive Review", &["Smith, J.", "Johnson, M."], 2023, Article, Venue::Journal("Journal of Medical AI")),
        suggestion("2", "Deep Learning for Computer Vision: Theory and Practice", &["Chen, L.", "Williams, R."], 2022, Book, Venue::Publisher("Academic Press")),
        suggestion("3", "Climate Change Impact on Global Food Security", &["Anderson, K."], 2023, Article, Venue::Journal("Environmental Science Today")),
        suggestion("4", "Quantum Computing Algorithms for Optimization Problems", &["Zhang, Y.", "Brown, A.", "Davis, P."], 2024, Thesis, Venue::None),
        suggestion("5", "Artificial Intelligence Ethics in Modern Society", &["Wilson, S."], 2023, Book, Venue::Publisher("Ethics Publications")),
        suggestion("6", "Neural Networks for Natural Language Processing", &["Martinez, C.", "Lee, H."], 2022, Article, Venue::Journal("Computational Linguistics Review")),
        suggestion("7", "Blockchain Technology in Supply Chain Management", &["Thompson, R.", "Garcia, M."], 2023, Article, Venue::Journal("International Journal of Operations Management")),
        suggestion("8", "Sustainable Energy Systems: Renewable Technologies", &["O'Connor, P.", "Singh, A."], 2022, Book, Venue::Publisher("Green Energy Press")),
        suggestion("9", "Mental Health Interventions in Digital Age", &["Davis, E.", "Wang, L."], 2024, Article, Venue::Journal("Journal of Clinical Psychology")),
        suggestion("10", "Urban Planning and Smart Cities: Data-Driven Approaches", &["Johnson, A.", "Brown, K."], 2023, Article, Venue::Journal("Urban Studies Quarterly")),
        suggestion("11", "Microbiome Research in Human Health: From Gut to Brain", &["White, S.", "Chen, H."], 2022, Book, Venue::Publisher("Medical Science Publishers")),
        suggestion("12", "Cybersecurity in Critical Infrastructure", &["Taylor, R.", "Gonzalez, P."], 2024, Thesis, Venue::None),
        suggestion("13", "Economic Impact of Remote Work: Productivity and Well-being", &["Wilson, K.", "Martinez, D."], 2023, Article, Venue::Journal("Journal of Organizational Behavior")),
        suggestion("14", "Advanced Materials for Energy Storage", &["Kim, Y.", "Zhang, W."], 2022, Article, Venue::Journal("Materials Science and Engineering")),
        suggestion("15", "Digital Transformation in Healthcare: Telemedicine and AI", &["Patel, A.", "Garcia, R."], 2024, Article, Venue::Journal("Healthcare Technology Review")),
        suggestion("16", "Social Media and Political Polarization", &["Brown, C.", "Johnson, E."], 2023, Article, Venue::Journal("Political Communication Studies")),
        suggestion("17", "Robotics in Manufacturing: Industry 4.0", &["Miller, G.", "Anderson, P."], 2022, Book, Venue::Publisher("Industrial Technology Press")),
        suggestion("18", "Environmental Economics: Carbon Pricing Solutions", &["Rodriguez, S.", "Wang, T."], 2024, Article, Venue::Journal("Environmental Economics Quarterly")),
        suggestion("19", "Neuroscience of Learning: Cognitive Enhancement", &["Lee, V.", "Gonzalez, W."], 2023, Article, Venue::Journal("Educational Neuroscience")),
        suggestion("20", "Space Exploration Technologies: Mars Mission Planning", &["White, Z.", "Chen, A."], 2022, Article, Venue::Journal("Space Science and Technology")),
        suggestion("21", "Financial Technology and Digital Banking", &["Taylor, C.", "Johnson, D."], 2024, Book, Venue::Publisher("Financial Technology Press")),
        suggestion("22", "Biodiversity Conservation in Urban Environments", &["Anderson, F.", "Wang, G."], 2023, Article, Venue::Journal("Urban Ecology and Conservation")),
        suggestion("23", "Quantum Machine Learning: Drug Discovery Applications", &["Kim, I.", "Garcia, J."], 2024, Thesis, Venue::None),
        suggestion("24", "Social Psychology of Online Communities", &["Miller, L.", "Rodriguez, M."], 2023, Article, Venue::Journal("Social Psychology Quarterly")),
        suggestion("25", "Advanced Manufacturing Processes: 3D Printing", &["Thompson, O.", "Chen, P."], 2022, Article, Venue::Journal("Manufacturing Technology Review")),
    ]
}

/// Suggestions whose title, an author, journal or publisher contains the query
///
/// Blank queries yield nothing.
pub fn suggestions(query: &str, limit: usize) -> Vec<Suggestion> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    suggestion_records()
        .into_iter()
        .filter(|record| {
            contains(&record.title)
                || record.authors.iter().any(|author| contains(author))
                || record.journal.as_deref().is_some_and(contains)
                || record.publisher.as_deref().is_some_and(contains)
        })
        .take(limit)
        .collect()
}

/// The facet catalog
pub fn filter_groups() -> Vec<FilterGroup> {
    vec![
        FilterGroup::new(
            "type",
            "Resource Type",
            vec![
                FilterOption::new("article", "Journal Articles", 1247),
                FilterOption::new("book", "Books", 342),
                FilterOption::new("thesis", "Theses", 89),
                FilterOption::new("conference", "Conference Papers", 567),
                FilterOption::new("report", "Technical Reports", 234),
            ],
        ),
        FilterGroup::new(
            "year",
            "Publication Year",
            vec![
                FilterOption::new("2024", "2024", 156),
                FilterOption::new("2023", "2023", 423),
                FilterOption::new("2022", "2022", 567),
                FilterOption::new("2021", "2021", 489),
                FilterOption::new("2020", "2020", 312),
                FilterOption::new("older", "Before 2020", 1532),
            ],
        ),
        FilterGroup::new(
            "subject",
            "Subject Area",
            vec![
                FilterOption::new("computer-science", "Computer Science", 892),
                FilterOption::new("engineering", "Engineering", 543),
                FilterOption::new("medicine", "Medicine & Health", 434),
                FilterOption::new("physics", "Physics", 321),
                FilterOption::new("biology", "Biology", 298),
                FilterOption::new("chemistry", "Chemistry", 267),
                FilterOption::new("mathematics", "Mathematics", 198),
                FilterOption::new("social-sciences", "Social Sciences", 156),
            ],
        ),
        FilterGroup::new(
            "access",
            "Access Type",
            vec![
                FilterOption::new("open-access", "Open Access", 1234),
                FilterOption::new("subscription", "Subscription Required", 1567),
                FilterOption::new("free", "Free to Read", 890),
            ],
        ),
        FilterGroup::new(
            "language",
            "Language",
            vec![
                FilterOption::new("english", "English", 2341),
                FilterOption::new("spanish", "Spanish", 234),
                FilterOption::new("french", "French", 189),
                FilterOption::new("german", "German", 156),
                FilterOption::new("chinese", "Chinese", 134),
                FilterOption::new("other", "Other Languages", 423),
            ],
        ),
    ]
}

enum Venue {
    Journal(&'static str),
    Publisher(&'static str),
    None,
}

fn suggestion(
    id: &str,
    title: &str,
    authors: &[&str],
    year: i32,
    resource_type: ResourceType,
    venue: Venue,
) -> Suggestion {
    let (journal, publisher) = match venue {
        Venue::Journal(name) => (Some(name.to_string()), None),
        Venue::Publisher(name) => (None, Some(name.to_string())),
        Venue::None => (None, None),
    };
    Suggestion {
        id: id.to_string(),
        title: title.to_string(),
        authors: strings(authors),
        resource_type,
        year,
        journal,
        publisher,
    }
}

fn related(id: &str, title: &str, resource_type: &str, relationship: &str) -> RelatedResource {
    RelatedResource {
        id: id.to_string(),
        title: title.to_string(),
        resource_type: resource_type.to_string(),
        relationship: relationship.to_string(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_sizes() {
        assert_eq!(search_results().len(), 6);
        assert_eq!(detail_resources().len(), 2);
        assert_eq!(suggestion_records().len(), 25);
        assert_eq!(filter_groups().len(), 5);
    }

    #[test]
    fn test_search_matches_tags_and_description() {
        let ids: Vec<String> = search_resources("machine learning")
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1"]);

        assert_eq!(search_resources("   ").len(), 6);
        assert!(search_resources("no such topic").is_empty());
    }

    #[test]
    fn test_detail_lookup() {
        let detail = detail_resource("2").unwrap();
        assert_eq!(detail.isbn.as_deref(), Some("978-0-12-345678-9"));
        assert!(detail_resource("99").is_none());
    }

    #[test]
    fn test_suggestions_limit_and_fields() {
        let quantum = suggestions("quantum", 5);
        assert_eq!(quantum.len(), 2);

        let by_author = suggestions("chen", 3);
        assert_eq!(by_author.len(), 3);
        assert_eq!(by_author[0].id, "2");

        let by_publisher = suggestions("green energy", 5);
        assert_eq!(by_publisher[0].id, "8");

        assert!(suggestions("", 5).is_empty());
    }
}
