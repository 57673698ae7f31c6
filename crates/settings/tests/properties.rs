// Property-based tests for normalization.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use sovendus_settings::{normalize, SettingsVersion};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Identifier: mostly digits, sometimes text, sometimes empty, sometimes a legacy number.
fn arb_id() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => "[0-9]{1,5}".prop_map(Value::from),
        2 => "[a-z0-9-]{1,8}".prop_map(Value::from),
        1 => Just(Value::from("")),
        1 => (0u32..100_000).prop_map(Value::from),
    ]
}

fn arb_locale_entry() -> impl Strategy<Value = Value> {
    (any::<bool>(), arb_id(), arb_id()).prop_map(|(enabled, source, medium)| {
        json!({ "isEnabled": enabled, "trafficSourceNumber": source, "trafficMediumNumber": medium })
    })
}

fn arb_country_map() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(
        prop::sample::select(vec!["DE", "AT", "CH", "FR", "NL"]),
        prop::collection::btree_map(prop::sample::select(vec!["de", "fr", "it", "nl"]), arb_locale_entry(), 0..3),
        0..4,
    )
    .prop_map(|countries| {
        let ids: Map<String, Value> = countries
            .into_iter()
            .map(|(country, languages)| {
                let languages: Map<String, Value> =
                    languages.into_iter().map(|(l, e)| (l.to_string(), e)).collect();
                (country.to_string(), json!({ "languages": languages }))
            })
            .collect();
        json!({ "ids": ids })
    })
}

fn arb_mode() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(vec!["simple", "country"]))
}

fn arb_voucher_network() -> impl Strategy<Value = Value> {
    (arb_mode(), prop::option::of(any::<bool>()), prop::option::of(arb_country_map())).prop_map(
        |(mode, cookie, countries)| {
            let mut section = Map::new();
            if let Some(mode) = mode {
                section.insert("settingType".into(), mode.into());
            }
            if let Some(cookie) = cookie {
                section.insert("cookieTracking".into(), cookie.into());
            }
            if let Some(countries) = countries {
                section.insert("countries".into(), countries);
            }
            Value::Object(section)
        },
    )
}

fn arb_optimize() -> impl Strategy<Value = Value> {
    (arb_mode(), prop::option::of((any::<bool>(), "[a-z0-9]{0,6}"))).prop_map(|(mode, simple)| {
        let mut section = Map::new();
        if let Some(mode) = mode {
            section.insert("settingsType".into(), mode.into());
        }
        if let Some((enabled, id)) = simple {
            section.insert("simple".into(), json!({ "isEnabled": enabled, "optimizeId": id }));
        }
        Value::Object(section)
    })
}

fn arb_raw_settings() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop_oneof![Just(json!("1")), Just(json!("2")), Just(json!(3)), Just(Value::Null)]),
        prop::option::of(arb_voucher_network()),
        prop::option::of(arb_optimize()),
        prop::option::of(any::<bool>()),
        prop::option::of((any::<bool>(), any::<bool>(), any::<bool>())),
    )
        .prop_map(|(version, vn, optimize, checkout_products, eb)| {
            let mut root = Map::new();
            if let Some(version) = version {
                root.insert("version".into(), version);
            }
            if let Some(vn) = vn {
                root.insert("voucherNetwork".into(), vn);
            }
            if let Some(optimize) = optimize {
                root.insert("optimize".into(), optimize);
            }
            if let Some(flag) = checkout_products {
                root.insert("checkoutProducts".into(), flag.into());
            }
            if let Some((enabled, sidebar, widget)) = eb {
                root.insert(
                    "employeeBenefits".into(),
                    json!({ "isEnabled": enabled, "addToSidebar": sidebar, "showWidgetOnDashboard": widget }),
                );
            }
            Value::Object(root)
        })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn normalize_is_idempotent(raw in arb_raw_settings()) {
        let once = normalize(raw.to_string()).unwrap();
        let twice = normalize(once.clone()).unwrap();
        prop_assert_eq!(&once, &twice);

        // also through the serialized form
        let via_json = normalize(once.to_json().unwrap()).unwrap();
        prop_assert_eq!(once, via_json);
    }

    #[test]
    fn version_is_always_current(raw in arb_raw_settings()) {
        let settings = normalize(raw.to_string()).unwrap();
        prop_assert_eq!(settings.version, SettingsVersion::CURRENT);
    }

    #[test]
    fn absent_sections_stay_absent(raw in arb_raw_settings()) {
        let settings = normalize(raw.to_string()).unwrap();
        if raw.get("optimize").is_none() {
            prop_assert!(settings.optimize.is_none());
        }
        if raw.get("voucherNetwork").is_none() {
            prop_assert!(settings.voucher_network.is_none());
        }
        if raw.get("checkoutProducts").is_none() {
            prop_assert!(settings.checkout_products.is_none());
        }
        if raw.get("employeeBenefits").is_none() {
            prop_assert!(settings.employee_benefits.is_none());
        }
    }

    #[test]
    fn present_sections_are_never_empty_objects(raw in arb_raw_settings()) {
        let value = serde_json::to_value(normalize(raw.to_string()).unwrap()).unwrap();
        for key in ["optimize", "voucherNetwork"] {
            if let Some(section) = value.get(key) {
                prop_assert!(section.as_object().is_some_and(|o| !o.is_empty()));
            }
        }
    }
}
