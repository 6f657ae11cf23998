use super::*;

fn none_low_medium() -> LabelBreakpoints {
    LabelBreakpoints::new([(0.0, "None"), (2.5, "Low"), (5.0, "Medium")]).expect("breakpoints")
}

fn memberships(pairs: &[(&str, f64)]) -> MembershipMap {
    pairs.iter().map(|(key, degree)| (*key, *degree)).collect()
}

#[test]
fn value_just_below_a_breakpoint_keeps_the_lower_label() {
    let breakpoints = none_low_medium();
    assert_eq!(label_for(2.4, &breakpoints), "None");
    assert_eq!(label_for(2.49, &breakpoints), "None");
}

#[test]
fn breakpoints_are_inclusive_lower_bounds() {
    let breakpoints = none_low_medium();
    assert_eq!(label_for(2.5, &breakpoints), "Low");
    assert_eq!(label_for(5.0, &breakpoints), "Medium");
    assert_eq!(label_for(99.0, &breakpoints), "Medium");
}

#[test]
fn value_below_every_breakpoint_maps_to_the_lowest_label() {
    let breakpoints = none_low_medium();
    assert_eq!(label_for(-3.0, &breakpoints), "None");
    assert_eq!(label_for(f64::NAN, &breakpoints), "None");
}

#[test]
fn unsorted_input_is_sorted_once() {
    let breakpoints =
        LabelBreakpoints::new([(5.0, "Medium"), (0.0, "None"), (2.5, "Low")]).expect("valid");
    assert_eq!(breakpoints, none_low_medium());
    assert_eq!(breakpoints.label_for(3.0), "Low");
}

#[test]
fn invalid_breakpoints_are_rejected() {
    assert_eq!(
        LabelBreakpoints::new(Vec::<(f64, String)>::new()),
        Err(LabelError::Empty)
    );
    assert_eq!(
        LabelBreakpoints::new([(1.0, "a"), (1.0, "b")]),
        Err(LabelError::Duplicate(1.0))
    );
    assert!(matches!(
        LabelBreakpoints::new([(f64::INFINITY, "a")]),
        Err(LabelError::NonFinite(_))
    ));
}

#[test]
fn readiness_intensity_buckets_match_service_thresholds() {
    let buckets = presets::readiness_intensity();
    assert_eq!(buckets.label_for(0.0), "Rest");
    assert_eq!(buckets.label_for(19.9), "Rest");
    assert_eq!(buckets.label_for(20.0), "Light");
    assert_eq!(buckets.label_for(59.9), "Moderate");
    assert_eq!(buckets.label_for(60.0), "Hard");
    assert_eq!(buckets.label_for(100.0), "Beast");
}

#[test]
fn bmi_bands() {
    let bands = presets::bmi();
    assert_eq!(bands.label_for(17.0), "underweight");
    assert_eq!(bands.label_for(18.5), "healthy");
    assert_eq!(bands.label_for(27.3), "overweight");
    assert_eq!(bands.label_for(31.0), "obese");
}

#[test]
fn dominant_keeps_first_of_tied_maxima() {
    let map = memberships(&[("sleep", 0.2), ("energy", 0.7), ("stress", 0.7)]);
    assert_eq!(dominant(&map), Some(("energy", 0.7)));

    let reversed = memberships(&[("stress", 0.7), ("energy", 0.7), ("sleep", 0.2)]);
    assert_eq!(dominant(&reversed), Some(("stress", 0.7)));
}

#[test]
fn dominant_of_empty_and_all_zero_maps() {
    assert_eq!(dominant(&MembershipMap::new()), None);

    let zeros = memberships(&[("low", 0.0), ("high", 0.0)]);
    assert_eq!(dominant(&zeros), Some(("low", 0.0)));
}

#[test]
fn dominant_ignores_nan_degrees() {
    let map = memberships(&[("low", f64::NAN), ("medium", 0.4), ("high", 0.1)]);
    assert_eq!(dominant(&map), Some(("medium", 0.4)));
}

#[test]
fn slider_reports_fill_label_and_markers() {
    let slider = Slider::zero_to_ten("Sleep Quality", presets::sleep());
    assert_eq!(slider.fill_pct(7.0), 70.0);
    assert_eq!(slider.current_label(7.0), "Okay");
    assert_eq!(slider.current_label(7.5), "Good");

    let markers = slider.markers();
    assert_eq!(markers.len(), 5);
    assert_eq!(markers[1].position_pct, 25.0);
    assert_eq!(markers[4].label, "Amazing");
}

#[test]
fn slider_snaps_to_half_steps_within_bounds() {
    let slider = Slider::zero_to_ten("Stress", presets::stress());
    assert_eq!(slider.snap(3.3), 3.5);
    assert_eq!(slider.snap(3.2), 3.0);
    assert_eq!(slider.snap(12.0), 10.0);
    assert_eq!(slider.snap(-1.0), 0.0);
}
