/// The full schema with every `\ir` include inlined.
pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_cities.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_cities.sql")),
				"tables/002_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_categories.sql")),
				"tables/003_venues.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_venues.sql")),
				"tables/004_events.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_events.sql")),
				"tables/005_ticket_tiers.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_ticket_tiers.sql")),
				"tables/006_services.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_services.sql")),
				"tables/007_collections.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_collections.sql")),
				"tables/008_blog_posts.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_blog_posts.sql")),
				"tables/009_sponsored_slots.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_sponsored_slots.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
