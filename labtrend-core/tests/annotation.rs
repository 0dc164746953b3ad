use chrono::NaiveDate;
use labtrend_core::annotation::{
    begin_at_zero, event_annotations, event_legend, threshold_annotations, MAX_LINE_COLOR,
    MIN_LINE_COLOR,
};
use labtrend_core::{
    build_chart, parse_ref_range, Annotation, ChartConfig, Measurement, ParameterSeries,
    Threshold, CLINICAL_EVENTS,
};

fn sample(date: &str, value: f64, ref_range: Option<&str>) -> Measurement {
    Measurement {
        date: date.to_string(),
        value,
        unit: "g/dL".to_string(),
        ref_range: ref_range.map(str::to_string),
        note: None,
    }
}

fn horizontal(annotations: &[Annotation]) -> Vec<(&str, Threshold, f64, &str)> {
    annotations
        .iter()
        .filter_map(|annotation| match annotation {
            Annotation::Horizontal {
                parameter: name,
                threshold,
                value,
                label,
                ..
            } => Some((name.as_str(), *threshold, *value, label.content.as_str())),
            Annotation::Vertical { .. } => None,
        })
        .collect()
}

#[test]
fn axis_starts_at_zero_only_for_small_non_negative_values() {
    assert!(begin_at_zero([5.0, 10.0, 15.0], 20.0));
    assert!(!begin_at_zero([25.0, 30.0], 20.0));
    assert!(!begin_at_zero([-1.0, 5.0], 20.0));
    assert!(!begin_at_zero(std::iter::empty(), 20.0));
    assert!(!begin_at_zero([f64::NAN, 1.0], 20.0));
}

#[test]
fn threshold_lines_follow_available_bounds() {
    let both = threshold_annotations("Hemoglobina", &parse_ref_range(Some("[12-16]")), None);
    assert_eq!(
        horizontal(&both),
        vec![
            ("Hemoglobina", Threshold::Min, 12.0, "Ref Min: 12"),
            ("Hemoglobina", Threshold::Max, 16.0, "Ref Max: 16"),
        ]
    );

    let upper = threshold_annotations("PCR", &parse_ref_range(Some("<5")), None);
    assert_eq!(horizontal(&upper).len(), 1);
    assert!(matches!(
        &upper[0],
        Annotation::Horizontal { threshold: Threshold::Max, style, .. }
            if style.color == MAX_LINE_COLOR
    ));

    assert!(threshold_annotations("X", &parse_ref_range(None), None).is_empty());
}

#[test]
fn single_parameter_lines_use_fixed_colours() {
    let lines = threshold_annotations("Sodio", &parse_ref_range(Some("135-145")), None);
    let colours: Vec<&str> = lines
        .iter()
        .filter_map(|annotation| match annotation {
            Annotation::Horizontal { style, .. } => Some(style.color.as_str()),
            Annotation::Vertical { .. } => None,
        })
        .collect();
    assert_eq!(colours, vec![MIN_LINE_COLOR, MAX_LINE_COLOR]);
}

#[test]
fn every_event_gets_a_vertical_line_but_only_some_a_label() {
    let lines = event_annotations(&CLINICAL_EVENTS);
    assert_eq!(lines.len(), CLINICAL_EVENTS.len());

    let labelled: Vec<(&str, bool)> = lines
        .iter()
        .filter_map(|annotation| match annotation {
            Annotation::Vertical {
                event_id,
                label,
                ..
            } => Some((event_id.as_str(), label.is_some())),
            Annotation::Horizontal { .. } => None,
        })
        .collect();
    assert_eq!(
        labelled,
        vec![("pembro1", false), ("pembro2", false), ("ensayoEnd", true)]
    );
}

#[test]
fn unlabelled_events_go_to_the_legend() {
    let legend = event_legend(&CLINICAL_EVENTS);
    let entries: Vec<(&str, &str)> = legend
        .iter()
        .map(|entry| (entry.date_label.as_str(), entry.description.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("17 mar", "1ª dosis Pembrolizumab"),
            ("07 abr", "2ª dosis Pembrolizumab"),
        ]
    );
    assert_eq!(
        legend[0].date,
        NaiveDate::from_ymd_opt(2025, 3, 17).expect("valid date")
    );
}

#[test]
fn representative_range_is_the_earliest_measurement() {
    let series = ParameterSeries::new(
        "Glucosa",
        vec![
            sample("2025-04-01", 95.0, Some("70-110")),
            sample("2025-01-15", 130.0, Some("[60-100]")),
        ],
    );
    let chart = build_chart(&[series], &[], &ChartConfig::default());

    let values: Vec<f64> = horizontal(&chart.annotations)
        .into_iter()
        .map(|(_, _, value, _)| value)
        .collect();
    assert_eq!(values, vec![60.0, 100.0]);
    assert_eq!(chart.title, "Glucosa - Evolución (Ref: [60-100])");
    assert_eq!(chart.datasets[0].points[0].value, 130.0);
    assert!(!chart.axes.begin_at_zero);
}

#[test]
fn single_chart_texts_and_tooltips() {
    let mut first = sample("17/03/2025", 13.5, Some("[12-16]"));
    first.note = Some("post transfusión".to_string());
    let second = sample("2025-04-07", 11.0, None);
    let series = ParameterSeries::new("Hemoglobina", vec![first, second]);

    let mut config = ChartConfig::default();
    config
        .general_ref_ranges
        .insert("Hemoglobina".to_string(), "12 - 16 g/dL".to_string());

    let chart = build_chart(&[series], &CLINICAL_EVENTS, &config);
    assert_eq!(chart.title, "Hemoglobina - Evolución (12 - 16 g/dL)");
    assert_eq!(chart.axes.y_title, "Valor (g/dL)");
    assert_eq!(chart.axes.x_title, "Fecha del Análisis");
    assert!(chart.axes.begin_at_zero);
    assert_eq!(chart.datasets[0].label, "Hemoglobina (g/dL)");
    assert_eq!(chart.datasets[0].color, "#4f46e5");

    let first_point = &chart.datasets[0].points[0];
    assert_eq!(first_point.tooltip_title, "17/03/2025");
    assert_eq!(
        first_point.tooltip_body,
        "Hemoglobina: 13.5 g/dL (Ref: [12-16]) (post transfusión)"
    );
    let second_point = &chart.datasets[0].points[1];
    assert_eq!(second_point.tooltip_body, "Hemoglobina: 11 g/dL");

    assert_eq!(chart.annotations.len(), 2 + CLINICAL_EVENTS.len());
    assert_eq!(chart.legend.len(), 2);
}

#[test]
fn overlay_cycles_the_palette_and_names_thresholds() {
    let config = ChartConfig {
        palette: vec!["#111111".to_string(), "#222222".to_string()],
        ..ChartConfig::default()
    };
    let series: Vec<ParameterSeries> = ["A", "B", "C"]
        .iter()
        .map(|name| ParameterSeries::new(*name, vec![sample("2025-01-01", 25.0, Some(">10"))]))
        .collect();

    let chart = build_chart(&series, &[], &config);
    let colours: Vec<&str> = chart.datasets.iter().map(|d| d.color.as_str()).collect();
    assert_eq!(colours, vec!["#111111", "#222222", "#111111"]);

    let lines = horizontal(&chart.annotations);
    assert_eq!(lines[1], ("B", Threshold::Min, 10.0, "B Ref Min: 10"));
    assert!(matches!(
        &chart.annotations[2],
        Annotation::Horizontal { style, .. } if style.color == "#111111"
    ));
    assert_eq!(chart.title, "A, B, C - Evolución");
    assert_eq!(chart.axes.y_title, "Valor");
}

#[test]
fn axis_hint_spans_all_series() {
    let series = vec![
        ParameterSeries::new("A", vec![sample("2025-01-01", 50.0, None)]),
        ParameterSeries::new("B", vec![sample("2025-01-01", 5.0, None)]),
    ];
    let chart = build_chart(&series, &[], &ChartConfig::default());
    assert!(chart.axes.begin_at_zero);

    let with_negative = vec![
        series[0].clone(),
        ParameterSeries::new("C", vec![sample("2025-01-01", -0.5, None)]),
    ];
    let chart = build_chart(&with_negative, &[], &ChartConfig::default());
    assert!(!chart.axes.begin_at_zero);
}

#[test]
fn bundle_serializes_with_tagged_annotations() {
    let series = ParameterSeries::new("K", vec![sample("2025-01-01", 4.1, Some("3,5-5,1"))]);
    let chart = build_chart(&[series], &CLINICAL_EVENTS[2..], &ChartConfig::default());
    let value = serde_json::to_value(&chart).expect("serialize bundle");

    assert_eq!(value["annotations"][0]["kind"], "horizontal");
    assert_eq!(value["annotations"][0]["threshold"], "min");
    assert_eq!(value["annotations"][2]["kind"], "vertical");
    assert_eq!(value["annotations"][2]["date"], "2025-05-05");
    let event_label = &value["annotations"][2]["label"];
    assert_eq!(event_label["content"], "Fin del Ensayo");
    assert_eq!(value["datasets"][0]["points"][0]["date"], "2025-01-01");
}
