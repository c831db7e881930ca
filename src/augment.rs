//! Augmentation decision.
//!
//! A query needs fresh web context when it touches time-sensitive or
//! jurisdiction-specific tax facts. The check is a fixed trigger-term table
//! matched by case-insensitive substring containment: cheap, deterministic,
//! and free of any network call.

/// Trigger terms for time-sensitive or jurisdiction-specific queries.
/// Grouped: year tokens, deadline vocabulary, regulatory form references,
/// regional regimes, recency markers.
const TRIGGER_TERMS: &[&str] = &[
    "2023",
    "2024",
    "2025",
    "2026",
    "plazo",
    "fecha límite",
    "fecha limite",
    "vencimiento",
    "calendario fiscal",
    "cuándo se presenta",
    "cuando se presenta",
    "modelo 100",
    "modelo 111",
    "modelo 115",
    "modelo 130",
    "modelo 131",
    "modelo 303",
    "modelo 349",
    "modelo 390",
    "navarra",
    "país vasco",
    "pais vasco",
    "canarias",
    "igic",
    "cataluña",
    "cataluna",
    "madrid",
    "andalucía",
    "andalucia",
    "novedades",
    "este año",
    "este trimestre",
    "última reforma",
    "ultima reforma",
];

/// Returns true when the query contains any trigger term.
pub fn needs_context(query: &str) -> bool {
    let normalized = query.to_lowercase();
    TRIGGER_TERMS.iter().any(|term| normalized.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_query_triggers_augmentation() {
        assert!(needs_context("¿Cuál es el plazo para el modelo 130?"));
    }

    #[test]
    fn test_definition_query_does_not_trigger() {
        assert!(!needs_context("¿Qué es el IRPF?"));
    }

    #[test]
    fn test_year_token_triggers_augmentation() {
        assert!(needs_context("Tipos de IVA vigentes en 2025"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(needs_context("PLAZO de presentación del IVA"));
        assert!(needs_context("Régimen foral de NAVARRA"));
    }

    #[test]
    fn test_regional_regime_triggers_augmentation() {
        assert!(needs_context("¿Cómo tributa el IGIC en Canarias?"));
    }
}
