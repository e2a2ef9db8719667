//! Known input/report pairs.

/// An input together with the report it must produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    pub input: &'static str,
    pub expected: &'static str,
}

/// Reference scenarios covering mixed keys, a single record, empty input and
/// tied values.
///
/// # Example
///
/// ```
/// use ironbrc::testing::scenarios;
/// use ironbrc::Runner;
///
/// for s in scenarios() {
///     let summary = Runner::default().run(s.input.as_bytes()).unwrap();
///     assert_eq!(summary.report(), s.expected, "{}", s.name);
/// }
/// ```
#[must_use]
pub const fn scenarios() -> &'static [Scenario] {
    &[
        Scenario {
            name: "mixed keys, unterminated last record",
            input: "Kabala;-10.4\nKhrustalnyi;-6.6\nKabala;96.4\nKabala;-11.3",
            expected: "{Kabala=-11.3/96.4/24.9, Khrustalnyi=-6.6/-6.6/-6.6}",
        },
        Scenario {
            name: "single record",
            input: "Paris;21.5",
            expected: "{Paris=21.5/21.5/21.5}",
        },
        Scenario {
            name: "empty input",
            input: "",
            expected: "{}",
        },
        Scenario {
            name: "tied values",
            input: "A;5.0\nB;5.0",
            expected: "{A=5.0/5.0/5.0, B=5.0/5.0/5.0}",
        },
        Scenario {
            name: "wide integer parts",
            input: "Hot;123.4\nHot;5.6\nCold;-250.0\n",
            expected: "{Cold=-250.0/-250.0/-250.0, Hot=5.6/123.4/64.5}",
        },
        Scenario {
            name: "mean rounds half away from zero",
            input: "p;0.1\np;0.2\nn;-0.1\nn;-0.2\n",
            expected: "{n=-0.2/-0.1/-0.2, p=0.1/0.2/0.2}",
        },
    ]
}

/// A handful of realistic weather-station records, newline-terminated.
#[must_use]
pub const fn sample_measurements() -> &'static str {
    "Hamburg;12.0\n\
     Bulawayo;8.9\n\
     Palembang;38.8\n\
     St. John's;15.2\n\
     Cracow;12.6\n\
     Bridgetown;26.9\n\
     Istanbul;6.2\n\
     Roseau;34.4\n\
     Conakry;31.2\n\
     Istanbul;23.0\n"
}
