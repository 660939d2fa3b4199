use std::cmp::Ordering;

// Clave de ordenación aproximada para nombres en árabe: unifica las formas
// de alef, taa marbuta y alef maqsura, ignora tatweel y diacríticos, y
// compara sin distinguir mayúsculas en textos latinos.
fn fold(c: char) -> Option<char> {
    match c {
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' => Some('\u{0627}'),
        '\u{0629}' => Some('\u{0647}'),
        '\u{0649}' => Some('\u{064A}'),
        '\u{0640}' => None,
        '\u{064B}'..='\u{065F}' | '\u{0670}' => None,
        c if c.is_whitespace() => Some(' '),
        c => c.to_lowercase().next(),
    }
}

/// Comparación de cadenas sensible al idioma usada para ordenar por nombre.
/// A igualdad de clave se desempata por el texto original para que el orden
/// sea total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let ka = a.trim().chars().filter_map(fold);
    let kb = b.trim().chars().filter_map(fold);
    ka.cmp(kb).then_with(|| a.cmp(b))
}
