//! Transient top recommendations panel

use crate::gateway::Recommendation;

/// Local UI state; never part of the conversation history
#[derive(Debug, Default)]
pub struct TopPanel {
    recommendations: Option<Vec<Recommendation>>,
}

impl TopPanel {
    pub fn open(&mut self, recommendations: Vec<Recommendation>) {
        self.recommendations = Some(recommendations);
    }

    pub fn close(&mut self) {
        self.recommendations = None;
    }

    pub fn is_open(&self) -> bool {
        self.recommendations.is_some()
    }

    pub fn lines(&self) -> Vec<String> {
        let Some(recommendations) = &self.recommendations else {
            return vec![];
        };
        let mut lines = vec!["== Top recommendations ==".to_string()];
        for (i, rec) in recommendations.iter().enumerate() {
            let mut line = format!("{}. {}", i + 1, rec.title);
            if !rec.authors.is_empty() {
                line.push_str(" by ");
                line.push_str(&rec.author_line());
            }
            let genres = rec.display_genres();
            if !genres.is_empty() {
                line.push_str(&format!(" ({})", genres.join(", ")));
            }
            lines.push(line);
        }
        lines.push("== /close to dismiss ==".to_string());
        lines
    }
}
