use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

pub const MAX_SLUG_CHARS: usize = 80;

/// Builds a URL-safe slug: lowercase ASCII letters, digits and single dashes.
///
/// Cyrillic is transliterated, other letters lose their diacritics, everything else becomes a
/// separator. Returns an empty string when nothing usable remains.
pub fn slugify(title: &str) -> String {
	let mut transliterated = String::with_capacity(title.len());

	for ch in title.chars().flat_map(char::to_lowercase) {
		match transliterate(ch) {
			Some(latin) => transliterated.push_str(latin),
			None => transliterated.push(ch),
		}
	}

	let mut slug = String::with_capacity(transliterated.len());
	let mut pending_dash = false;

	for ch in transliterated.nfkd().filter(|ch| !is_combining_mark(*ch)) {
		if ch.is_ascii_alphanumeric() {
			if pending_dash && !slug.is_empty() {
				slug.push('-');
			}

			slug.push(ch.to_ascii_lowercase());

			pending_dash = false;
		} else if ch.is_alphanumeric() {
			// Letters with no ASCII fold are dropped without splitting the word.
			continue;
		} else {
			pending_dash = true;
		}

		if slug.len() >= MAX_SLUG_CHARS {
			break;
		}
	}

	slug.truncate(MAX_SLUG_CHARS);

	slug.trim_end_matches('-').to_string()
}

/// `base` for attempt zero, `base-N` afterwards.
pub fn with_suffix(base: &str, attempt: u32) -> String {
	if attempt == 0 { base.to_string() } else { format!("{base}-{attempt}") }
}

/// Slug base for a title, falling back to `fallback` when the title has no usable characters.
pub fn slug_base(title: &str, fallback: &str) -> String {
	let slug = slugify(title);

	if slug.is_empty() { fallback.to_string() } else { slug }
}

fn transliterate(ch: char) -> Option<&'static str> {
	let latin = match ch {
		'а' => "a",
		'б' => "b",
		'в' => "v",
		'г' => "g",
		'д' => "d",
		'е' | 'ё' | 'э' => "e",
		'ж' => "zh",
		'з' => "z",
		'и' => "i",
		'й' => "y",
		'к' => "k",
		'л' => "l",
		'м' => "m",
		'н' => "n",
		'о' => "o",
		'п' => "p",
		'р' => "r",
		'с' => "s",
		'т' => "t",
		'у' => "u",
		'ф' => "f",
		'х' => "h",
		'ц' => "ts",
		'ч' => "ch",
		'ш' => "sh",
		'щ' => "sch",
		'ъ' | 'ь' => "",
		'ы' => "y",
		'ю' => "yu",
		'я' => "ya",
		_ => return None,
	};

	Some(latin)
}
