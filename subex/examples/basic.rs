use subex::{CompileFlags, Pattern, PatternCache, Replace};

fn main() {
    let re = Pattern::new(r"(\w+)=(\d+)");
    for groups in re.parse_all(b"width=80 height=24") {
        let [_, Some(key), Some(value)] = groups[..] else {
            unreachable!()
        };
        println!(
            "{} -> {}",
            String::from_utf8_lossy(key),
            String::from_utf8_lossy(value)
        );
    }

    let fields = Pattern::new(r"\s*,\s*").split(b"a, b ,c");
    assert_eq!(fields, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);

    let re = Replace::parse("/(\\w+) (\\w+)/$2, $1/i").unwrap();
    assert_eq!(re.exec(b"Ada Lovelace"), b"Lovelace, Ada");

    // Broken patterns are reported via `log::warn!` and never match
    let cache = PatternCache::default();
    let broken = cache.pattern("(", CompileFlags::default());
    assert!(!broken.is_compiled());
    assert_eq!(broken.split(b"abc"), vec![&b"abc"[..]]);
}
