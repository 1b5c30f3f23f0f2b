use super::*;

#[test]
fn accepts_triple_summing_to_exactly_one_hundred() {
    let triple = validate("30", "30", "40").expect("valid triple");
    assert_eq!(triple, ValueTriple::new(30.0, 30.0, 40.0));
}

#[test]
fn accepts_decimal_values_and_surrounding_whitespace() {
    let triple = validate(" 20.5 ", "39.5", "40").expect("valid triple");
    assert_eq!(triple, ValueTriple::new(20.5, 39.5, 40.0));
}

#[test]
fn reports_deficit_when_sum_is_low() {
    let err = validate("30", "30", "30").expect_err("sum too low");
    assert_eq!(
        err,
        ValidationError::SumTooLow {
            sum: 90.0,
            deficit: 10.0
        }
    );
    assert_eq!(err.to_string(), "Sum is 90. Need 10 more to reach 100");
    assert!(err.is_sum_mismatch());
}

#[test]
fn reports_excess_when_sum_is_high() {
    let err = validate("50", "50", "10").expect_err("sum too high");
    assert_eq!(
        err,
        ValidationError::SumTooHigh {
            sum: 110.0,
            excess: 10.0
        }
    );
    assert_eq!(err.to_string(), "Sum is 110. Reduce by 10 to reach 100");
}

#[test]
fn zero_is_not_positive() {
    let err = validate("0", "50", "50").expect_err("zero rejected");
    assert_eq!(err, ValidationError::NonPositiveValue);
    assert_eq!(err.to_string(), "All values must be greater than zero");
    assert!(!err.is_sum_mismatch());
}

#[test]
fn one_hundred_is_rejected_even_with_tiny_companions() {
    let err = validate("100", "0.01", "0.01").expect_err("100 rejected");
    assert_eq!(err, ValidationError::ValueTooLarge);
    assert_eq!(err.to_string(), "No single value can be 100 or more");
}

#[test]
fn missing_field_wins_over_every_other_rule() {
    for (a, b, c) in [("", "50", "50"), ("abc", "", "1"), ("-1", "200", "  ")] {
        assert_eq!(
            validate(a, b, c),
            Err(ValidationError::MissingField),
            "input ({a:?}, {b:?}, {c:?})"
        );
    }
    assert_eq!(
        ValidationError::MissingField.to_string(),
        "All fields are required"
    );
}

#[test]
fn non_numeric_input_is_rejected_before_range_checks() {
    for (a, b, c) in [
        ("abc", "-5", "1"),
        ("12abc", "30", "58"),
        ("NaN", "50", "50"),
        ("inf", "1", "1"),
        ("1e999", "1", "1"),
    ] {
        assert_eq!(
            validate(a, b, c),
            Err(ValidationError::NotANumber),
            "input ({a:?}, {b:?}, {c:?})"
        );
    }
}

#[test]
fn non_positive_component_fails_regardless_of_the_others() {
    for bad in ["0", "-0", "-1", "-99.5"] {
        for other in ["1", "50", "99.99", "150"] {
            let cases = [(bad, other, other), (other, bad, other), (other, other, bad)];
            for (a, b, c) in cases {
                assert_eq!(
                    validate(a, b, c),
                    Err(ValidationError::NonPositiveValue),
                    "input ({a}, {b}, {c})"
                );
            }
        }
    }
}

#[test]
fn component_of_one_hundred_or_more_fails_regardless_of_the_others() {
    for bad in ["100", "100.0001", "250"] {
        for other in ["0.01", "50", "99.99"] {
            let cases = [(bad, other, other), (other, bad, other), (other, other, bad)];
            for (a, b, c) in cases {
                assert_eq!(
                    validate(a, b, c),
                    Err(ValidationError::ValueTooLarge),
                    "input ({a}, {b}, {c})"
                );
            }
        }
    }
}

#[test]
fn sum_check_uses_exact_floating_point_equality() {
    let cases = [
        ("33.33", "33.33", "33.34"),
        ("0.1", "0.2", "99.7"),
        ("10.1", "20.2", "69.7"),
        ("33.3", "33.3", "33.4"),
        ("1", "2", "97"),
    ];
    for (a, b, c) in cases {
        let (x, y, z): (f64, f64, f64) = (
            a.parse().expect("a"),
            b.parse().expect("b"),
            c.parse().expect("c"),
        );
        let sum = x + y + z;
        match validate(a, b, c) {
            Ok(triple) => {
                assert_eq!(sum, 100.0, "accepted ({a}, {b}, {c})");
                assert_eq!(triple, ValueTriple::new(x, y, z));
            }
            Err(ValidationError::SumTooLow { sum: got, deficit }) => {
                assert!(sum < 100.0);
                assert_eq!(got, sum);
                assert_eq!(deficit, 100.0 - sum);
            }
            Err(ValidationError::SumTooHigh { sum: got, excess }) => {
                assert!(sum > 100.0);
                assert_eq!(got, sum);
                assert_eq!(excess, sum - 100.0);
            }
            Err(other) => panic!("unexpected error {other:?} for ({a}, {b}, {c})"),
        }
    }
}

#[test]
fn access_code_must_be_four_digits() {
    assert_eq!(validate_access_code("1234"), Ok("1234"));
    assert_eq!(validate_access_code(" 0042 "), Ok("0042"));
    for bad in ["", "123", "12345", "12a4", "١٢٣٤"] {
        assert_eq!(validate_access_code(bad), Err(AuthError::InvalidCode), "{bad:?}");
    }
    assert_eq!(
        AuthError::InvalidCode.to_string(),
        "Please enter a valid 4-digit code"
    );
}

#[test]
fn display_name_must_not_be_blank() {
    assert_eq!(validate_display_name("  Ada "), Ok("Ada"));
    assert_eq!(validate_display_name("   "), Err(AuthError::MissingName));
}

#[test]
fn tiny_sum_gaps_are_printed_in_exponent_form() {
    let err = validate("99.9999999", "0.00000001", "0.00000001").expect_err("short of 100");
    assert_eq!(
        err.to_string(),
        "Sum is 99.99999992. Need 8.000000661922968e-8 more to reach 100"
    );

    let over = ValidationError::SumTooHigh {
        sum: 100.0000003,
        excess: 3e-7,
    };
    assert_eq!(over.to_string(), "Sum is 100.0000003. Reduce by 3e-7 to reach 100");

    let plain = ValidationError::SumTooLow {
        sum: 99.5,
        deficit: 0.5,
    };
    assert_eq!(plain.to_string(), "Sum is 99.5. Need 0.5 more to reach 100");
}
