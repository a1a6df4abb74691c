use std::io::Write;

use tempfile::NamedTempFile;
use turngate_config::load_model_csv;

fn write_csv(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    f.write_all(content.as_bytes()).expect("write csv");
    f.flush().expect("flush");
    f
}

#[test]
fn loads_the_reference_shape() {
    let f = write_csv(
        "upper_us,a0,a1,a2,a3,a4\n\
         500000,268.2445651096,0.998685885,7.73699143114947e-9,0,0\n\
         2000000,2585.5449062138,0.9910487474,1.28978803947511e-8,0,0\n\
         0,343733.782110879,0.5422132849,2.19266935692185e-7,-3.96812534603555e-14,3.10525846921924e-21\n",
    );
    let segments = load_model_csv(f.path()).expect("load");
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].upper_us, Some(500_000));
    assert_eq!(segments[1].upper_us, Some(2_000_000));
    assert_eq!(segments[2].upper_us, None);
    // Trailing zero coefficients are trimmed to the fitted degree.
    assert_eq!(segments[0].coeffs.len(), 3);
    assert_eq!(segments[2].coeffs.len(), 5);
}

#[test]
fn rejects_wrong_headers() {
    let f = write_csv("bound,a0,a1,a2,a3,a4\n0,1,0,0,0,0\n");
    let err = load_model_csv(f.path()).expect_err("headers");
    assert!(
        err.to_string().contains("upper_us,a0,a1,a2,a3,a4"),
        "unexpected: {err}"
    );
}

#[test]
fn rejects_unbounded_segment_before_the_end() {
    let f = write_csv(
        "upper_us,a0,a1,a2,a3,a4\n\
         0,1,0,0,0,0\n\
         500000,1,0,0,0,0\n",
    );
    assert!(load_model_csv(f.path()).is_err());
}

#[test]
fn rejects_descending_bounds() {
    let f = write_csv(
        "upper_us,a0,a1,a2,a3,a4\n\
         500000,1,0,0,0,0\n\
         400000,1,0,0,0,0\n\
         0,1,0,0,0,0\n",
    );
    assert!(load_model_csv(f.path()).is_err());
}

#[test]
fn rejects_missing_unbounded_tail() {
    let f = write_csv("upper_us,a0,a1,a2,a3,a4\n500000,1,0,0,0,0\n");
    assert!(load_model_csv(f.path()).is_err());
}

#[test]
fn rejects_non_numeric_rows() {
    let f = write_csv("upper_us,a0,a1,a2,a3,a4\n0,one,0,0,0,0\n");
    let err = load_model_csv(f.path()).expect_err("bad row");
    assert!(err.to_string().contains("row 2"), "unexpected: {err}");
}

#[test]
fn rejects_empty_file() {
    let f = write_csv("upper_us,a0,a1,a2,a3,a4\n");
    assert!(load_model_csv(f.path()).is_err());
}

#[test]
fn constant_only_segment_keeps_one_coefficient() {
    let f = write_csv("upper_us,a0,a1,a2,a3,a4\n0,42.5,0,0,0,0\n");
    let segments = load_model_csv(f.path()).expect("load");
    assert_eq!(segments[0].coeffs, vec![42.5]);
}
