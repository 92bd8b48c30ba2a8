//! The fixed catalogue of environments backing the network diagram.
//!
//! Seeded once at load time; nothing here mutates during a session. Positions
//! and velocities live in the simulation state, not the catalogue.

/// Category of a catalogued environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
	Finance,
	Healthcare,
	Logistics,
	Robotics,
	Social,
}

impl Category {
	/// Number of categories, also the number of angular sectors in the layout.
	pub const COUNT: usize = 5;

	/// Every category, in sector order.
	pub const ALL: [Category; Self::COUNT] = [
		Category::Finance,
		Category::Healthcare,
		Category::Logistics,
		Category::Robotics,
		Category::Social,
	];

	pub fn label(self) -> &'static str {
		match self {
			Category::Finance => "Finance",
			Category::Healthcare => "Healthcare",
			Category::Logistics => "Logistics",
			Category::Robotics => "Robotics",
			Category::Social => "Social",
		}
	}

	/// Fill color used when drawing nodes of this category.
	pub fn color(self) -> &'static str {
		match self {
			Category::Finance => "#00d9ff",
			Category::Healthcare => "#2ca02c",
			Category::Logistics => "#ff7f0e",
			Category::Robotics => "#bd00ff",
			Category::Social => "#e377c2",
		}
	}

	/// Index into [`Category::ALL`].
	pub fn index(self) -> usize {
		self as usize
	}
}

/// Difficulty tier shown in the hover tooltip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
	Beginner,
	Intermediate,
	Advanced,
	Expert,
}

impl Difficulty {
	pub fn label(self) -> &'static str {
		match self {
			Difficulty::Beginner => "Beginner",
			Difficulty::Intermediate => "Intermediate",
			Difficulty::Advanced => "Advanced",
			Difficulty::Expert => "Expert",
		}
	}
}

/// One catalogued environment. Everything except the simulation's position and
/// velocity is immutable after load; `id` is unique for the page session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
	pub id: u32,
	pub name: &'static str,
	pub category: Category,
	/// Explorer count, first input to the visual radius.
	pub popularity: u32,
	/// Weeks since the environment went live, second input to the radius.
	pub age_weeks: f64,
	pub reward: &'static str,
	pub difficulty: Difficulty,
	pub time_estimate: &'static str,
}

/// The currently selected category filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
	#[default]
	All,
	Only(Category),
}

impl CategoryFilter {
	/// Whether an entity of the given category passes the filter.
	pub fn matches(self, category: Category) -> bool {
		match self {
			CategoryFilter::All => true,
			CategoryFilter::Only(selected) => selected == category,
		}
	}
}

/// The environment catalogue.
pub const CATALOGUE: &[Environment] = &[
	Environment {
		id: 1,
		name: "Market Maker Arena",
		category: Category::Finance,
		popularity: 456,
		age_weeks: 24.0,
		reward: "$50-$500",
		difficulty: Difficulty::Advanced,
		time_estimate: "2-4 h",
	},
	Environment {
		id: 2,
		name: "Credit Risk Desk",
		category: Category::Finance,
		popularity: 212,
		age_weeks: 16.0,
		reward: "$30-$250",
		difficulty: Difficulty::Intermediate,
		time_estimate: "1-2 h",
	},
	Environment {
		id: 3,
		name: "Fraud Patrol",
		category: Category::Finance,
		popularity: 98,
		age_weeks: 6.0,
		reward: "$20-$120",
		difficulty: Difficulty::Beginner,
		time_estimate: "45 min",
	},
	Environment {
		id: 4,
		name: "Triage Ward",
		category: Category::Healthcare,
		popularity: 321,
		age_weeks: 30.0,
		reward: "$40-$400",
		difficulty: Difficulty::Expert,
		time_estimate: "3-5 h",
	},
	Environment {
		id: 5,
		name: "Epidemic Response",
		category: Category::Healthcare,
		popularity: 154,
		age_weeks: 12.0,
		reward: "$25-$200",
		difficulty: Difficulty::Advanced,
		time_estimate: "2 h",
	},
	Environment {
		id: 6,
		name: "Pharmacy Stock",
		category: Category::Healthcare,
		popularity: 45,
		age_weeks: 3.0,
		reward: "$10-$80",
		difficulty: Difficulty::Beginner,
		time_estimate: "30 min",
	},
	Environment {
		id: 7,
		name: "Last-Mile Dispatch",
		category: Category::Logistics,
		popularity: 287,
		age_weeks: 20.0,
		reward: "$35-$300",
		difficulty: Difficulty::Intermediate,
		time_estimate: "1-3 h",
	},
	Environment {
		id: 8,
		name: "Port Scheduler",
		category: Category::Logistics,
		popularity: 132,
		age_weeks: 9.0,
		reward: "$25-$180",
		difficulty: Difficulty::Advanced,
		time_estimate: "2 h",
	},
	Environment {
		id: 9,
		name: "Cold Chain Relay",
		category: Category::Logistics,
		popularity: 18,
		age_weeks: 0.5,
		reward: "$10-$60",
		difficulty: Difficulty::Beginner,
		time_estimate: "20 min",
	},
	Environment {
		id: 10,
		name: "Warehouse Swarm",
		category: Category::Robotics,
		popularity: 389,
		age_weeks: 28.0,
		reward: "$45-$450",
		difficulty: Difficulty::Expert,
		time_estimate: "3-6 h",
	},
	Environment {
		id: 11,
		name: "Rover Field Test",
		category: Category::Robotics,
		popularity: 176,
		age_weeks: 14.0,
		reward: "$30-$220",
		difficulty: Difficulty::Intermediate,
		time_estimate: "1-2 h",
	},
	Environment {
		id: 12,
		name: "Assembly Cell",
		category: Category::Robotics,
		popularity: 64,
		age_weeks: 4.0,
		reward: "$15-$100",
		difficulty: Difficulty::Beginner,
		time_estimate: "40 min",
	},
	Environment {
		id: 13,
		name: "Creator Economy",
		category: Category::Social,
		popularity: 243,
		age_weeks: 18.0,
		reward: "$30-$280",
		difficulty: Difficulty::Intermediate,
		time_estimate: "1-2 h",
	},
	Environment {
		id: 14,
		name: "Moderation Sim",
		category: Category::Social,
		popularity: 87,
		age_weeks: 7.0,
		reward: "$20-$140",
		difficulty: Difficulty::Advanced,
		time_estimate: "90 min",
	},
];

/// Declared "related to" links between environments, as unordered id pairs.
/// Duplicates are tolerated; pairs naming unknown ids are dropped at load.
pub const CONNECTIONS: &[(u32, u32)] = &[
	(1, 2),
	(2, 3),
	(1, 7),
	(4, 5),
	(5, 6),
	(4, 14),
	(7, 8),
	(8, 9),
	(7, 10),
	(10, 11),
	(11, 12),
	(10, 1),
	(13, 14),
	(13, 3),
	(12, 6),
];

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalogue_ids_are_unique() {
		for (i, a) in CATALOGUE.iter().enumerate() {
			for b in &CATALOGUE[i + 1..] {
				assert_ne!(a.id, b.id, "duplicate id {}", a.id);
			}
		}
	}

	#[test]
	fn connections_reference_known_ids() {
		for &(a, b) in CONNECTIONS {
			assert!(CATALOGUE.iter().any(|e| e.id == a), "unknown id {a}");
			assert!(CATALOGUE.iter().any(|e| e.id == b), "unknown id {b}");
			assert_ne!(a, b, "self-loop on id {a}");
		}
	}

	#[test]
	fn every_category_has_members() {
		for cat in Category::ALL {
			assert!(CATALOGUE.iter().any(|e| e.category == cat));
		}
	}

	#[test]
	fn filter_matching() {
		assert!(CategoryFilter::All.matches(Category::Robotics));
		assert!(CategoryFilter::Only(Category::Finance).matches(Category::Finance));
		assert!(!CategoryFilter::Only(Category::Finance).matches(Category::Social));
	}
}
