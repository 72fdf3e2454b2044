//! Bundled sample catalog
//!
//! Used for development and as the fallback when no catalog source is
//! configured. Goes through the same row normalization as real data.

use crate::core::opportunity::{Opportunity, normalize_rows};

const SAMPLE_CATALOG: &str = r#"[
  {
    "id": "1",
    "title": "HackMIT 2026",
    "organization": "MIT",
    "category": "hackathon",
    "deadline": "2026-01-08",
    "description": "Join 1000+ hackers for a weekend of innovation at MIT. Build something amazing!",
    "url": "https://hackmit.org",
    "tags": ["AI", "Web3", "Hardware"],
    "location": "Cambridge, MA",
    "mode": "On-site"
  },
  {
    "id": "2",
    "title": "Google STEP Internship",
    "organization": "Google",
    "category": "internship",
    "deadline": "2026-01-10",
    "description": "Summer internship for first and second year CS students. Work on impactful projects.",
    "url": "https://careers.google.com",
    "tags": ["Software Engineering", "Paid", "Remote"],
    "location": "Mountain View, CA",
    "isPaid": true,
    "mode": "Hybrid"
  },
  {
    "id": "3",
    "title": "Meta Hacker Cup",
    "organization": "Meta",
    "category": "Coding Challenge",
    "deadline": "2026-01-20",
    "description": "Annual competitive programming competition with prizes up to $20,000.",
    "url": "https://www.facebook.com/codingcompetitions/hacker-cup",
    "tags": ["Algorithms", "Competitive Programming", "Prizes"],
    "mode": "Virtual"
  },
  {
    "id": "4",
    "title": "TreeHacks 2026",
    "organization": "Stanford University",
    "category": "hackathon",
    "deadline": "2026-01-12",
    "description": "Stanford's flagship hackathon. 36 hours of building and hacking.",
    "url": "https://treehacks.com",
    "tags": ["Health", "Sustainability", "Education"],
    "location": "Stanford, CA",
    "mode": "On-site"
  },
  {
    "id": "5",
    "title": "Microsoft Explore Program",
    "organization": "Microsoft",
    "category": "internship",
    "deadline": "2026-02-01",
    "description": "Rotational program for freshmen and sophomores interested in PM, Design, or Engineering.",
    "url": "https://careers.microsoft.com",
    "tags": ["Product Management", "Design", "Engineering"],
    "location": "Redmond, WA",
    "isPaid": true,
    "mode": "On-site"
  },
  {
    "id": "6",
    "title": "AWS DeepRacer Challenge",
    "organization": "Amazon Web Services",
    "category": "challenge",
    "deadline": "2026-01-07",
    "description": "Build and race autonomous 1/18th scale cars using reinforcement learning.",
    "url": "https://aws.amazon.com/deepracer",
    "tags": ["Machine Learning", "Autonomous Vehicles", "AWS"],
    "mode": "Virtual"
  },
  {
    "id": "7",
    "title": "Research Science Institute",
    "organization": "Center for Excellence in Education",
    "category": "Summer Program",
    "deadline": "2026-01-15",
    "description": "Six-week summer research program pairing high school students with mentors.",
    "url": "https://www.cee.org/programs/research-science-institute",
    "tags": ["Research", "STEM", "Mentorship"],
    "location": "Cambridge, MA",
    "mode": "On-site"
  }
]"#;

/// Returns the sample catalog in canonical form
pub fn sample_catalog() -> Vec<Opportunity> {
    match serde_json::from_str(SAMPLE_CATALOG) {
        Ok(rows) => normalize_rows(rows),
        Err(e) => {
            tracing::error!("Bundled sample catalog is invalid: {}", e);
            Vec::new()
        }
    }
}
