use roster::Record;
use roster::parse::{LineParseFailure, Separator, parse_line};

const ALADDIN_LINE: &str = "Aladdin,NoLastName,aladdin@prince.org,rug,Fuzzy,6'";

fn comma() -> Separator {
    Separator::default()
}

#[test]
fn valid_line_becomes_record() {
    let record = parse_line(ALADDIN_LINE, &comma()).expect("valid line should parse");

    assert_eq!(
        record,
        Record::new(
            "Aladdin",
            "NoLastName",
            "aladdin@prince.org",
            "rug",
            "Fuzzy",
            Some(6)
        )
    );
}

#[test]
fn valid_line_with_trailing_newline_matches_line_without() {
    let with_newline = parse_line(&format!("{ALADDIN_LINE}\n"), &comma())
        .expect("line with newline should parse");
    let without = parse_line(ALADDIN_LINE, &comma()).expect("line should parse");

    assert_eq!(with_newline, without);
}

#[test]
fn valid_line_with_mismatched_separator_fails() {
    let separator = Separator::new("|").expect("pipe separator should be valid");
    let failure = parse_line(ALADDIN_LINE, &separator).expect_err("pipe split must fail");

    assert_eq!(
        failure,
        LineParseFailure {
            expected: 6,
            found: 1
        }
    );
}

#[test]
fn pipe_separated_line_parses_with_pipe_separator() {
    let separator = Separator::new("|").expect("pipe separator should be valid");
    let record = parse_line(
        "Greta|Thunberg|greta@future.com|sailboat|Fridays For Future|32'",
        &separator,
    )
    .expect("pipe line should parse");

    assert_eq!(record.vehicle_type, "sailboat");
    assert_eq!(record.vehicle_name, "Fridays For Future");
    assert_eq!(record.vehicle_length_ft, Some(32));
}

#[test]
fn line_with_not_enough_fields_fails() {
    let failure = parse_line("not,enough,data", &comma()).expect_err("three fields must fail");
    assert_eq!(failure.found, 3);
}

#[test]
fn line_with_too_many_fields_fails() {
    let failure = parse_line("w,a,y,t,o,o,m,a,n,y,fields,here,wow,so,much,data", &comma())
        .expect_err("sixteen fields must fail");
    assert_eq!(failure.found, 16);
}

#[test]
fn free_form_lengths_keep_only_leading_feet() {
    let record = parse_line(
        "Ansel,Adams,a@adams.com,motorboat,Rushing Water,24 ft 8 in",
        &comma(),
    )
    .expect("line should parse");
    assert_eq!(record.vehicle_length_ft, Some(24));

    let record = parse_line("Ansel,Adams,a@adams.com,motorboat,Rushing Water,unknown", &comma())
        .expect("line without digits should still parse");
    assert_eq!(record.vehicle_length_ft, Some(0));
}
