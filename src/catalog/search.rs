//! Accent-folded catalog search.
//!
//! Matching is a case-insensitive substring test over title, artist, album and
//! genre after stripping diacritics. Vietnamese đ/Đ fold to d/D, which plain
//! combining-mark removal would miss.

use super::model::Track;

/// Strip diacritical marks and lowercase, for search comparison.
pub fn fold_diacritics(s: &str) -> String {
    s.chars().map(fold_char).collect::<String>().to_lowercase()
}

fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ' | 'ấ'
        | 'ẩ' | 'ẫ' | 'ậ' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Ả' | 'Ã' | 'Ạ' | 'Ă' | 'Ằ' | 'Ắ' | 'Ẳ' | 'Ẵ' | 'Ặ' | 'Â' | 'Ầ' | 'Ấ'
        | 'Ẩ' | 'Ẫ' | 'Ậ' | 'Ä' | 'Å' => 'A',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' => 'e',
        'È' | 'É' | 'Ẻ' | 'Ẽ' | 'Ẹ' | 'Ê' | 'Ề' | 'Ế' | 'Ể' | 'Ễ' | 'Ệ' | 'Ë' => 'E',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Ỉ' | 'Ĩ' | 'Ị' | 'Î' | 'Ï' => 'I',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ' | 'ớ'
        | 'ở' | 'ỡ' | 'ợ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ỏ' | 'Õ' | 'Ọ' | 'Ô' | 'Ồ' | 'Ố' | 'Ổ' | 'Ỗ' | 'Ộ' | 'Ơ' | 'Ờ' | 'Ớ'
        | 'Ở' | 'Ỡ' | 'Ợ' | 'Ö' => 'O',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Ủ' | 'Ũ' | 'Ụ' | 'Ư' | 'Ừ' | 'Ứ' | 'Ử' | 'Ữ' | 'Ự' | 'Û' | 'Ü' => 'U',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' | 'ÿ' => 'y',
        'Ỳ' | 'Ý' | 'Ỷ' | 'Ỹ' | 'Ỵ' => 'Y',
        // Letter substitution, not a combining mark.
        'đ' => 'd',
        'Đ' => 'D',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Search `tracks` for `query`, preserving catalog order.
pub fn search_tracks<'a>(tracks: &'a [Track], query: &str) -> Vec<&'a Track> {
    let needle = fold_diacritics(query.trim());
    if needle.is_empty() {
        return Vec::new();
    }
    tracks
        .iter()
        .filter(|t| {
            fold_diacritics(&t.title).contains(&needle)
                || fold_diacritics(&t.artist).contains(&needle)
                || fold_diacritics(&t.album).contains(&needle)
                || fold_diacritics(&t.genre).contains(&needle)
        })
        .collect()
}
