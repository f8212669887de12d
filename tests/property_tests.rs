//! Property-based tests for modlog using proptest

use modlog::core::render_template;
use modlog::prelude::*;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Critical),
        Just(Level::Error),
        Just(Level::Warning),
        Just(Level::Notice),
        Just(Level::Info),
        Just(Level::Debug),
    ]
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level string conversions round-trip, in any case
    #[test]
    fn test_level_str_roundtrip(level in any_level(), lower in any::<bool>()) {
        let name = if lower { level.to_str().to_lowercase() } else { level.to_str().to_string() };
        let parsed: Level = name.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Enablement is exactly the numeric comparison
    #[test]
    fn test_enabled_matches_ordinal(level in any_level(), threshold in any_level()) {
        prop_assert_eq!(
            level.is_enabled_under(threshold),
            (level as u8) <= (threshold as u8)
        );
    }

    /// A filter agrees with get_level for every module and level
    #[test]
    fn test_filter_enablement(
        level in any_level(),
        threshold in any_level(),
        module in "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}",
    ) {
        let leveled = ModuleLeveled::new(MemoryBackend::new(1));
        leveled.set_level(threshold, &module);
        prop_assert_eq!(leveled.get_level(&module), threshold);
        prop_assert_eq!(
            leveled.is_enabled_for(level, &module),
            (level as u8) <= (leveled.get_level(&module) as u8)
        );
    }

    /// Lowering a threshold never enables more levels
    #[test]
    fn test_threshold_monotonic(level in any_level(), a in any_level(), b in any_level()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if level.is_enabled_under(low) {
            prop_assert!(level.is_enabled_under(high));
        }
    }
}

// ============================================================================
// Module Rule Tests
// ============================================================================

proptest! {
    /// An exact rule wins over any pattern, whatever the registration order
    #[test]
    fn test_exact_beats_patterns(
        prefix in "[a-z]{1,5}",
        leaf in "[a-z]{1,5}",
        exact in any_level(),
        pattern in any_level(),
        exact_first in any::<bool>(),
    ) {
        let module = format!("{}.{}", prefix, leaf);
        let glob = format!("{}.*", prefix);
        let leveled = ModuleLeveled::new(MemoryBackend::new(1));
        if exact_first {
            leveled.set_level(exact, &module);
            leveled.set_level(pattern, &glob);
        } else {
            leveled.set_level(pattern, &glob);
            leveled.set_level(exact, &module);
        }
        prop_assert_eq!(leveled.get_level(&module), exact);
    }

    /// Among matching patterns the last registered one applies
    #[test]
    fn test_last_pattern_wins(
        module in "[a-z]{2,8}",
        levels in proptest::collection::vec(any_level(), 1..6),
    ) {
        let leveled = ModuleLeveled::new(MemoryBackend::new(1));
        let patterns = ["*", "?*", "*?", "[a-z]*"];
        for (i, level) in levels.iter().enumerate() {
            leveled.set_level(*level, patterns[i % patterns.len()]);
        }
        prop_assert_eq!(leveled.get_level(&module), *levels.last().unwrap());
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// Templates without braces render verbatim when there are no arguments
    #[test]
    fn test_plain_text_unchanged(text in "[^{}]*") {
        prop_assert_eq!(render_template(&text, &[]), text);
    }

    /// One placeholder per argument renders each argument once, in order
    #[test]
    fn test_placeholders_consume_in_order(values in proptest::collection::vec(0i64..1000, 0..8)) {
        let template = vec!["{}"; values.len()].join("|");
        let args: Vec<Arg> = values.iter().map(|v| Arg::from(*v)).collect();
        let expected = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("|");
        prop_assert_eq!(render_template(&template, &args), expected);
    }

    /// Redacted secrets never leak and keep their length
    #[test]
    fn test_secret_never_leaks(secret in "[a-zA-Z0-9]{1,32}") {
        let rendered = render_template("pw={}", &[Arg::from(Secret::new(secret.clone()))]);
        prop_assert!(!rendered.contains(&secret));
        prop_assert_eq!(rendered.chars().count(), 3 + secret.chars().count());
    }

    /// Messages never contain raw line breaks
    #[test]
    fn test_message_single_line(text in "\\PC*(\n|\r|\t)\\PC*") {
        let record = Record::new(1, chrono::Utc::now(), "p", Level::Info, "{}", vec![Arg::from(text)]);
        prop_assert!(!record.message().contains(['\n', '\r', '\t']));
    }
}
