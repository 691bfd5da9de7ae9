//! Character-width and kana-script conversions used by the rules.

/// Full-width forms of U+FF61..=U+FF9F in code point order.
#[rustfmt::skip]
const HALF_KANA: [char; 63] = [
    '。', '「', '」', '、', '・', 'ヲ', 'ァ', 'ィ',
    'ゥ', 'ェ', 'ォ', 'ャ', 'ュ', 'ョ', 'ッ', 'ー',
    'ア', 'イ', 'ウ', 'エ', 'オ', 'カ', 'キ', 'ク',
    'ケ', 'コ', 'サ', 'シ', 'ス', 'セ', 'ソ', 'タ',
    'チ', 'ツ', 'テ', 'ト', 'ナ', 'ニ', 'ヌ', 'ネ',
    'ノ', 'ハ', 'ヒ', 'フ', 'ヘ', 'ホ', 'マ', 'ミ',
    'ム', 'メ', 'モ', 'ヤ', 'ユ', 'ヨ', 'ラ', 'リ',
    'ル', 'レ', 'ロ', 'ワ', 'ン', '゛', '゜',
];

const HALF_KANA_START: u32 = 0xFF61;
const HALF_VOICED: char = 'ﾞ';
const HALF_SEMI_VOICED: char = 'ﾟ';

const VOICEABLE: &str = "カキクケコサシスセソタチツテトハヒフヘホ";
const SEMI_VOICEABLE: &str = "ハヒフヘホ";

fn offset(c: char, delta: i32) -> char {
    char::from_u32((c as i32 + delta) as u32).unwrap_or(c)
}

/// Full-width digit to its ASCII form.
pub fn full_width_digit(c: char) -> Option<char> {
    matches!(c, '０'..='９').then(|| offset(c, -0xFEE0))
}

/// Full-width ASCII (U+FF01..=U+FF5E) and the ideographic space to ASCII.
///
/// ```
/// assert_eq!(guard_rules::width::to_half_width_ascii("Ａｂｃ　１！"), "Abc 1!");
/// assert_eq!(guard_rules::width::to_half_width_ascii("カナ"), "カナ");
/// ```
pub fn to_half_width_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{FF01}'..='\u{FF5E}' => offset(c, -0xFEE0),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect()
}

fn half_kana(c: char) -> Option<char> {
    let index = (c as u32).checked_sub(HALF_KANA_START)? as usize;
    HALF_KANA.get(index).copied()
}

fn voiced(base: char) -> Option<char> {
    match base {
        'ウ' => Some('ヴ'),
        'ワ' => Some('ヷ'),
        'ヲ' => Some('ヺ'),
        _ if VOICEABLE.contains(base) => Some(offset(base, 1)),
        _ => None,
    }
}

fn semi_voiced(base: char) -> Option<char> {
    SEMI_VOICEABLE.contains(base).then(|| offset(base, 2))
}

/// Half-width katakana to full-width, merging a following voiced or
/// semi-voiced mark into the base character where one exists.
///
/// ```
/// assert_eq!(guard_rules::width::half_to_full_kana("ｶﾞｷﾞﾊﾟｳﾞ"), "ガギパヴ");
/// assert_eq!(guard_rules::width::half_to_full_kana("ｱﾞ"), "ア゛");
/// ```
pub fn half_to_full_kana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        let Some(full) = half_kana(c) else {
            out.push(c);
            continue;
        };
        let merged = match chars.peek().copied() {
            Some(HALF_VOICED) => voiced(full),
            Some(HALF_SEMI_VOICED) => semi_voiced(full),
            _ => None,
        };
        match merged {
            Some(m) => {
                out.push(m);
                chars.next();
            }
            None => out.push(full),
        }
    }
    out
}

fn to_half(full: char) -> Option<char> {
    let index = HALF_KANA.iter().position(|k| *k == full)?;
    char::from_u32(HALF_KANA_START + index as u32)
}

/// Full-width katakana to half-width, splitting voiced forms into base and
/// mark. Characters without a half-width form are kept.
///
/// ```
/// assert_eq!(guard_rules::width::full_to_half_kana("ガパヴ"), "ｶﾞﾊﾟｳﾞ");
/// ```
pub fn full_to_half_kana(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if let Some(h) = to_half(c) {
            out.push(h);
            continue;
        }
        let split = [(1, HALF_VOICED), (2, HALF_SEMI_VOICED)]
            .into_iter()
            .find_map(|(delta, mark)| {
                let base = match (c, delta) {
                    ('ヴ', 1) => 'ウ',
                    ('ヷ', 1) => 'ワ',
                    ('ヺ', 1) => 'ヲ',
                    _ => offset(c, -delta),
                };
                let composed = if delta == 1 {
                    voiced(base)
                } else {
                    semi_voiced(base)
                };
                (composed == Some(c)).then(|| (to_half(base), mark))
            });
        match split {
            Some((Some(base), mark)) => {
                out.push(base);
                out.push(mark);
            }
            _ => out.push(c),
        }
    }
    out
}

/// ```
/// assert_eq!(guard_rules::width::hiragana_to_katakana("あいゔゝー"), "アイヴヽー");
/// ```
pub fn hiragana_to_katakana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ぁ'..='ゖ' | 'ゝ' | 'ゞ' => offset(c, 0x60),
            _ => c,
        })
        .collect()
}

/// Katakana without a hiragana counterpart (ヷ, ヺ, ...) is kept.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'ァ'..='ヶ' | 'ヽ' | 'ヾ' => offset(c, -0x60),
            _ => c,
        })
        .collect()
}

/// Compatibility folding: full-width ASCII to ASCII and half-width kana to
/// full-width.
pub fn fold_compat(s: &str) -> String {
    half_to_full_kana(&to_half_width_ascii(s))
}
