//! Filtrage et ordonnancement des épisodes
//!
//! Les éléments arrivent de l'API dans l'ordre de la playlist (du plus ancien
//! au plus récent). Le filtre garde les titres qui correspondent au motif,
//! puis inverse toujours la liste : la sortie est du plus récent au plus
//! ancien, qu'un motif soit configuré ou non.

use pmoyoutube::PlaylistItem;
use regex::Regex;
use tracing::debug;

/// Filtre d'épisodes par expression régulière sur le titre
#[derive(Debug, Clone, Default)]
pub struct EpisodeFilter {
    pattern: Option<Regex>,
}

impl EpisodeFilter {
    /// Compile le motif une fois pour toutes
    ///
    /// Un motif absent ou composé uniquement d'espaces laisse tout passer ;
    /// tout autre motif est compilé tel quel.
    ///
    /// # Errors
    ///
    /// Renvoie l'erreur de compilation si le motif est invalide ; c'est une
    /// erreur de configuration, à traiter au démarrage.
    pub fn new(pattern: Option<&str>) -> Result<Self, regex::Error> {
        let pattern = match pattern {
            Some(p) if !p.trim().is_empty() => Some(Regex::new(p)?),
            _ => None,
        };
        Ok(Self { pattern })
    }

    /// Filtre qui laisse tout passer
    pub fn pass_through() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Applique le filtre et retourne les éléments du plus récent au plus ancien
    ///
    /// La correspondance est sensible à la casse et non ancrée, sauf si le
    /// motif lui-même contient des ancres.
    pub fn apply<'a>(&self, items: &'a [PlaylistItem]) -> Vec<&'a PlaylistItem> {
        let mut selected: Vec<&PlaylistItem> = match &self.pattern {
            Some(regex) => {
                let kept: Vec<_> = items.iter().filter(|i| regex.is_match(&i.title)).collect();
                debug!(
                    "Filtered {} videos out of {} using pattern: {}",
                    kept.len(),
                    items.len(),
                    regex.as_str()
                );
                kept
            }
            None => items.iter().collect(),
        };

        // Les nouveaux épisodes en premier
        selected.reverse();
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<PlaylistItem> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| PlaylistItem::new(format!("id{}", i), *t, ""))
            .collect()
    }

    fn titles<'a>(items: &[&'a PlaylistItem]) -> Vec<&'a str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_pattern_keeps_matches_newest_first() {
        let filter = EpisodeFilter::new(Some("^A")).unwrap();
        let input = items(&["A1", "B2", "A3"]);

        assert_eq!(titles(&filter.apply(&input)), vec!["A3", "A1"]);
    }

    #[test]
    fn test_no_pattern_still_reverses() {
        let filter = EpisodeFilter::new(None).unwrap();
        let input = items(&["X1", "X2", "X3"]);

        assert_eq!(titles(&filter.apply(&input)), vec!["X3", "X2", "X1"]);
    }

    #[test]
    fn test_empty_pattern_is_pass_through() {
        let filter = EpisodeFilter::new(Some("  ")).unwrap();
        assert!(filter.pattern().is_none());

        let input = items(&["X1", "X2"]);
        assert_eq!(titles(&filter.apply(&input)), vec!["X2", "X1"]);
    }

    #[test]
    fn test_unanchored_case_sensitive_match() {
        let filter = EpisodeFilter::new(Some("Live")).unwrap();
        let input = items(&["Concert Live 1", "live session", "Studio", "Live!"]);

        assert_eq!(titles(&filter.apply(&input)), vec!["Live!", "Concert Live 1"]);
    }

    #[test]
    fn test_nothing_matches() {
        let filter = EpisodeFilter::new(Some("^Z")).unwrap();
        assert!(filter.apply(&items(&["A", "B"])).is_empty());
        assert!(filter.apply(&[]).is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(EpisodeFilter::new(Some("(unclosed")).is_err());
    }

    #[test]
    fn test_pass_through() {
        let filter = EpisodeFilter::pass_through();
        assert!(filter.pattern().is_none());
        assert_eq!(filter.apply(&items(&["a", "b"])).len(), 2);
    }

    #[test]
    fn test_pattern_is_used_verbatim() {
        let filter = EpisodeFilter::new(Some(" Live")).unwrap();
        assert_eq!(filter.pattern(), Some(" Live"));

        let input = items(&["Concert Live 1", "Live!"]);
        assert_eq!(titles(&filter.apply(&input)), vec!["Concert Live 1"]);
    }
}
