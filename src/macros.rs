/// Build a `Vec<Token>` from a JSON-like literal sequence.
///
/// Arrays become start/end-array pairs; string and integer literals become
/// scalar tokens, and `null` becomes [`Token::Null`]. Negative integers must be
/// pushed by hand.
///
/// # Examples
///
/// ```rust
/// use serde_temporal::{tokens, Token};
///
/// let flat = tokens!["JANUARY"];
/// assert_eq!(flat, vec![Token::String("JANUARY".to_string())]);
///
/// let nested = tokens![["chrono::Month", [8]]];
/// assert_eq!(nested.len(), 6);
/// assert_eq!(nested[3], Token::Integer(8));
/// ```
#[macro_export]
macro_rules! tokens {
    // Array: push delimiters around each element
    (@one $out:ident [ $($elem:tt),* $(,)? ]) => {{
        $out.push($crate::Token::StartArray);
        $( $crate::tokens!(@one $out $elem); )*
        $out.push($crate::Token::EndArray);
    }};

    (@one $out:ident null) => {
        $out.push($crate::Token::Null);
    };

    // Scalar literal
    (@one $out:ident $lit:literal) => {
        $out.push($crate::Token::from($lit));
    };

    // Top level: a comma separated sequence
    ($($elem:tt),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut out: ::std::vec::Vec<$crate::Token> = ::std::vec::Vec::new();
        $( $crate::tokens!(@one out $elem); )*
        out
    }};
}
