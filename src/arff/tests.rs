// Tests for ARFF loading against Weka experimenter output
//
// Fixtures mirror what the experimenter's InstanceResultListener writes:
// key attributes declared as nominal lists, measurements as numerics.

use super::*;

const WEKA_RESULTS: &str = "\
% Weka experimenter output
@relation InstanceResultListener

@attribute Key_Dataset {iris}
@attribute Key_Run {1,2}
@attribute Key_Scheme {weka.classifiers.trees.J48,weka.classifiers.bayes.NaiveBayes}
@attribute Key_Scheme_options {'-C 0.25 -M 2',''}
@attribute Percent_correct numeric

@data
iris,1,weka.classifiers.trees.J48,'-C 0.25 -M 2',94.0
iris,2,weka.classifiers.trees.J48,'-C 0.25 -M 2',96.0
iris,1,weka.classifiers.bayes.NaiveBayes,'',95.5
iris,2,weka.classifiers.bayes.NaiveBayes,'',?
";

#[test]
fn test_parse_weka_results() {
    let dataset = parse(WEKA_RESULTS).unwrap();

    assert_eq!(dataset.relation, "InstanceResultListener");
    assert_eq!(dataset.attributes.len(), 5);
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.attribute_index("Percent_correct"), Some(4));
    assert_eq!(dataset.attribute_index("Key_Scheme"), Some(2));
    assert_eq!(dataset.attribute_index("percent_correct"), None);

    assert_eq!(dataset.rows[0][4].as_f64(), Some(94.0));
    assert_eq!(
        dataset.rows[2][2].as_str(),
        Some("weka.classifiers.bayes.NaiveBayes")
    );
    assert_eq!(dataset.rows[0][3].as_str(), Some("-C 0.25 -M 2"));
    assert_eq!(dataset.rows[2][3].as_str(), Some(""));
    assert!(dataset.rows[3][4].is_missing());
}

#[test]
fn test_parse_attribute_names_in_order() {
    let dataset = parse(WEKA_RESULTS).unwrap();
    let names: Vec<&str> = dataset.attribute_names().collect();
    assert_eq!(
        names,
        vec![
            "Key_Dataset",
            "Key_Run",
            "Key_Scheme",
            "Key_Scheme_options",
            "Percent_correct"
        ]
    );
}

#[test]
fn test_parse_directives_case_insensitive() {
    let text = "@RELATION r\n@ATTRIBUTE x REAL\n@DATA\n1\n";
    let dataset = parse(text).unwrap();
    assert_eq!(dataset.rows, vec![vec![Value::Numeric(1.0)]]);
}

#[test]
fn test_parse_quoted_nominal_with_commas() {
    let text = "@relation r\n\
                @attribute Key_Dataset {'iris-Remove-R1,2'}\n\
                @attribute Percent_correct numeric\n\
                @data\n\
                'iris-Remove-R1,2',90\n";
    let dataset = parse(text).unwrap();
    assert_eq!(dataset.rows[0][0].as_str(), Some("iris-Remove-R1,2"));
}

#[test]
fn test_parse_sparse_rows() {
    let text = "@relation r\n\
                @attribute a numeric\n\
                @attribute b {x,y}\n\
                @attribute c numeric\n\
                @data\n\
                {1 y, 2 3.5}\n\
                {}\n";
    let dataset = parse(text).unwrap();
    assert_eq!(
        dataset.rows[0],
        vec![
            Value::Numeric(0.0),
            Value::Nominal("y".to_string()),
            Value::Numeric(3.5)
        ]
    );
    assert_eq!(
        dataset.rows[1],
        vec![Value::Numeric(0.0), Value::Missing, Value::Numeric(0.0)]
    );
}

#[test]
fn test_parse_rejects_wrong_field_count() {
    let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1,2,3\n";
    assert_eq!(
        parse(text),
        Err(ArffError::BadDataFormat {
            line: 5,
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn test_parse_unquoted_commas_break_alignment() {
    // The failure mode the repair exists for
    let text = "@relation r\n\
                @attribute Key_Dataset {'a,b'}\n\
                @attribute Percent_correct numeric\n\
                @data\n\
                a,b,90\n";
    assert!(matches!(
        parse(text),
        Err(ArffError::BadDataFormat { line: 5, .. })
    ));
}

#[test]
fn test_parse_rejects_undeclared_nominal() {
    let text = "@relation r\n@attribute k {a,b}\n@data\nc\n";
    assert!(matches!(
        parse(text),
        Err(ArffError::BadNominal { line: 4, ref value, .. }) if value == "c"
    ));
}

#[test]
fn test_parse_rejects_bad_numeric() {
    let text = "@relation r\n@attribute x numeric\n@data\nabc\n";
    assert!(matches!(parse(text), Err(ArffError::BadNumeric { line: 4, .. })));
}

#[test]
fn test_parse_missing_data_section() {
    let text = "@relation r\n@attribute x numeric\n";
    assert_eq!(parse(text), Err(ArffError::MissingData));
}

#[test]
fn test_parse_missing_relation() {
    let text = "@attribute x numeric\n@data\n1\n";
    assert_eq!(parse(text), Err(ArffError::MissingRelation));
}

#[test]
fn test_parse_data_without_attributes() {
    let text = "@relation r\n@data\n";
    assert_eq!(parse(text), Err(ArffError::NoAttributes));
}

#[test]
fn test_parse_duplicate_attribute() {
    let text = "@relation r\n@attribute x numeric\n@attribute x numeric\n@data\n";
    assert!(matches!(
        parse(text),
        Err(ArffError::DuplicateAttribute { line: 3, .. })
    ));
}

#[test]
fn test_parse_garbage_in_header() {
    let text = "@relation r\nnot a directive\n";
    assert!(matches!(
        parse(text),
        Err(ArffError::UnexpectedContent { line: 2, .. })
    ));
}

#[test]
fn test_parse_crlf_line_endings() {
    let text = "@relation r\r\n@attribute x numeric\r\n@data\r\n2.5\r\n";
    let dataset = parse(text).unwrap();
    assert_eq!(dataset.rows[0][0].as_f64(), Some(2.5));
}

// ============================================================================
// Comma repair
// ============================================================================

#[test]
fn test_repair_removes_commas_from_declared_literal() {
    let raw = "@relation r\n\
               @attribute Key_Dataset {'a,b,c'}\n\
               @attribute Percent_correct numeric\n\
               @data\n\
               'a,b,c',90\n";
    let repair = repair_dataset_commas(raw, "Key_Dataset");

    assert_eq!(repair.literal.as_deref(), Some("a,b,c"));
    assert_eq!(repair.replaced, 2);
    assert!(repair.text.contains("@attribute Key_Dataset {'abc'}"));
    assert!(repair.text.contains("'abc',90"));
    assert!(parse(&repair.text).is_ok());
}

#[test]
fn test_repair_makes_unquoted_rows_parseable() {
    let raw = "@relation r\n\
               @attribute Key_Run numeric\n\
               @attribute Key_Dataset {'a,b'}\n\
               @attribute Percent_correct numeric\n\
               @data\n\
               1,a,b,90\n\
               2,a,b,91\n";
    assert!(parse(raw).is_err());

    let repair = repair_dataset_commas(raw, "Key_Dataset");
    assert_eq!(repair.replaced, 3);

    let dataset = parse(&repair.text).unwrap();
    assert_eq!(dataset.rows[1][1].as_str(), Some("ab"));
    assert_eq!(dataset.rows[1][2].as_f64(), Some(91.0));
}

#[test]
fn test_repair_leaves_unrelated_content_intact() {
    let raw = "% a,b,c appears in this comment\n\
               @relation 'a,b,c'\n\
               @attribute Key_Dataset {'a,b,c'}\n\
               @attribute Note string\n\
               @data\n\
               'a,b,c','a,b,c'\n";
    let repair = repair_dataset_commas(raw, "Key_Dataset");

    let lines: Vec<&str> = repair.text.lines().collect();
    assert_eq!(lines[0], "% a,b,c appears in this comment");
    assert_eq!(lines[1], "@relation 'a,b,c'");
    assert_eq!(lines[2], "@attribute Key_Dataset {'abc'}");
    assert_eq!(lines[5], "'abc','a,b,c'");
}

#[test]
fn test_repair_without_commas_is_noop() {
    let raw = "@relation r\n@attribute Key_Dataset {iris}\n@data\niris\n";
    let repair = repair_dataset_commas(raw, "Key_Dataset");
    assert_eq!(repair.text, raw);
    assert_eq!(repair.literal, None);
    assert_eq!(repair.replaced, 0);
}

#[test]
fn test_repair_without_declaration_is_noop() {
    let raw = "@relation r\n@attribute x numeric\n@data\n1\n";
    let repair = repair_dataset_commas(raw, "Key_Dataset");
    assert_eq!(repair.text, raw);
    assert_eq!(repair.replaced, 0);
}

#[test]
fn test_repair_preserves_crlf() {
    let raw = "@relation r\r\n@attribute Key_Dataset {'a,b'}\r\n@data\r\n'a,b'\r\n";
    let repair = repair_dataset_commas(raw, "Key_Dataset");
    assert_eq!(
        repair.text,
        "@relation r\r\n@attribute Key_Dataset {'ab'}\r\n@data\r\n'ab'\r\n"
    );
}
