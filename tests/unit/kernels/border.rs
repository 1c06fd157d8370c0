use super::*;

#[test]
fn reflect_mirrors_without_repeating_edge() {
    let cases_len5 = [
        (-7, 1),
        (-4, 4),
        (-3, 3),
        (-2, 2),
        (-1, 1),
        (0, 0),
        (4, 4),
        (5, 3),
        (6, 2),
        (7, 1),
        (8, 0),
        (9, 1),
    ];
    for (i, expected) in cases_len5 {
        assert_eq!(reflect(i, 5), expected, "reflect({i}, 5)");
    }
}

#[test]
fn reflect_degenerate_lengths() {
    for i in -6..=6 {
        assert_eq!(reflect(i, 1), 0);
    }
    let expected_len2 = [0, 1, 0, 1, 0, 1, 0, 1, 0];
    for (i, expected) in (-4..=4).zip(expected_len2) {
        assert_eq!(reflect(i, 2), expected);
    }
}

#[test]
fn clamp_saturates_both_edges() {
    assert_eq!(clamp(-3, 5), 0);
    assert_eq!(clamp(0, 5), 0);
    assert_eq!(clamp(4, 5), 4);
    assert_eq!(clamp(99, 5), 4);
}

#[test]
fn policy_dispatches_to_mapping() {
    assert_eq!(BorderPolicy::Reflect.map(-2, 4), 2);
    assert_eq!(BorderPolicy::Clamp.map(-2, 4), 0);
    assert_eq!(BorderPolicy::Reflect.map(5, 4), 1);
    assert_eq!(BorderPolicy::Clamp.map(5, 4), 3);
}
