use std::path::Path;

pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}

/// The file name without its final extension. "LTE RSRP AMBA.kmz" becomes "LTE RSRP AMBA", and a
/// dotfile like ".kmz" is returned unchanged. Returns None for paths without a UTF-8 file name.
pub fn basename<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|x| x.to_str())
        .map(|x| x.to_string())
}
