//! URL slugs derived from names

/// Lowercase ASCII words joined by single hyphens.
///
/// Letters with common Latin diacritics are folded to their base letter;
/// every other non-alphanumeric run becomes one hyphen.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars().flat_map(fold) {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn fold(c: char) -> impl Iterator<Item = char> {
    let folded: &'static str = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ß' => "ss",
        '&' => "-and-",
        _ => "",
    };

    let mut single = None;
    if folded.is_empty() {
        single = Some(c);
    }

    folded.chars().chain(single)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Atlantic Salmon Fillet"), "atlantic-salmon-fillet");
        assert_eq!(slugify("  Crab -- Legs!! "), "crab-legs");
        assert_eq!(slugify("Crème Fraîche Sauce"), "creme-fraiche-sauce");
        assert_eq!(slugify("Fish & Chips"), "fish-and-chips");
        assert_eq!(slugify("Tiger Prawns 1kg"), "tiger-prawns-1kg");
        assert_eq!(slugify("!!!"), "");
    }
}
