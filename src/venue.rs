/// One canonicalization rule. Matches when every keyword of at least one
/// group occurs in the lowercased venue text.
#[derive(Debug, Clone, Copy)]
pub struct VenueRule {
    pub canonical: &'static str,
    pub any_of: &'static [&'static [&'static str]],
}

impl VenueRule {
    pub fn matches(&self, lowered: &str) -> bool {
        self.any_of
            .iter()
            .any(|group| group.iter().all(|kw| lowered.contains(kw)))
    }
}

// Evaluated top to bottom, first match wins. A narrower rule must sit above
// any broader rule that shares one of its keywords.
pub const VENUE_RULES: &[VenueRule] = &[
    VenueRule {
        canonical: "Dr DY Patil Sports Academy, Mumbai",
        any_of: &[&["dy patil"], &["d.y. patil"], &["d y patil"]],
    },
    VenueRule {
        canonical: "Brabourne Stadium, Mumbai",
        any_of: &[&["brabourne"]],
    },
    VenueRule {
        canonical: "Buffalo Park, East London",
        any_of: &[&["buffalo park"]],
    },
    VenueRule {
        canonical: "Dubai International Cricket Stadium",
        any_of: &[&["dubai", "stadium"]],
    },
    VenueRule {
        canonical: "Sharjah Cricket Stadium",
        any_of: &[&["sharjah"]],
    },
    VenueRule {
        canonical: "Sheikh Zayed Stadium, Abu Dhabi",
        any_of: &[&["sheikh zayed"], &["zayed"]],
    },
    VenueRule {
        canonical: "M. Chinnaswamy Stadium, Bangalore",
        any_of: &[&["chinnaswamy"], &["bengaluru", "stadium"]],
    },
    VenueRule {
        canonical: "Wankhede Stadium, Mumbai",
        any_of: &[&["wankhede"]],
    },
    VenueRule {
        canonical: "MA Chidambaram Stadium, Chennai",
        any_of: &[&["chidambaram"], &["chepauk"]],
    },
    VenueRule {
        canonical: "Eden Gardens, Kolkata",
        any_of: &[&["eden gardens"]],
    },
    VenueRule {
        canonical: "Arun Jaitley Stadium, Delhi",
        any_of: &[&["feroz shah kotla"], &["arun jaitley"], &["delhi", "stadium"]],
    },
    VenueRule {
        canonical: "Rajiv Gandhi International Stadium, Hyderabad",
        any_of: &[&["rajiv gandhi"], &["uppal"]],
    },
    VenueRule {
        canonical: "Punjab Cricket Association Stadium, Mohali",
        any_of: &[&["punjab cricket"], &["mohali"], &["is bindra"]],
    },
    VenueRule {
        canonical: "Sawai Mansingh Stadium, Jaipur",
        any_of: &[&["sawai mansingh"], &["jaipur", "stadium"]],
    },
    VenueRule {
        canonical: "Narendra Modi Stadium, Ahmedabad",
        any_of: &[&["narendra modi"], &["motera"]],
    },
    VenueRule {
        canonical: "Maharashtra Cricket Association Stadium, Pune",
        any_of: &[&["maharashtra cricket"], &["pune", "stadium"]],
    },
    VenueRule {
        canonical: "HPCA Stadium, Dharamsala",
        any_of: &[&["hpca"], &["himachal pradesh"], &["dharamsala"]],
    },
    VenueRule {
        canonical: "Ekana Cricket Stadium, Lucknow",
        any_of: &[&["ekana"], &["lucknow", "stadium"]],
    },
    VenueRule {
        canonical: "Barsapara Cricket Stadium, Guwahati",
        any_of: &[&["barsapara"], &["guwahati"]],
    },
    VenueRule {
        canonical: "ACA-VDCA Stadium, Visakhapatnam",
        any_of: &[&["aca-vdca"], &["visakhapatnam"], &["vizag"]],
    },
];

pub fn canonicalize_venue(raw: &str) -> String {
    canonicalize_with(VENUE_RULES, raw)
}

pub fn canonicalize_with(rules: &[VenueRule], raw: &str) -> String {
    let trimmed = raw.trim();
    let lowered = trimmed.to_ascii_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn historical_spellings_collapse() {
        let cases = [
            ("M Chinnaswamy Stadium", "M. Chinnaswamy Stadium, Bangalore"),
            ("M.Chinnaswamy Stadium, Bengaluru", "M. Chinnaswamy Stadium, Bangalore"),
            ("Feroz Shah Kotla", "Arun Jaitley Stadium, Delhi"),
            ("Arun Jaitley Stadium", "Arun Jaitley Stadium, Delhi"),
            (
                "Punjab Cricket Association IS Bindra Stadium, Mohali",
                "Punjab Cricket Association Stadium, Mohali",
            ),
            (
                "Rajiv Gandhi International Stadium, Uppal, Hyderabad",
                "Rajiv Gandhi International Stadium, Hyderabad",
            ),
            ("Sardar Patel Stadium, Motera", "Narendra Modi Stadium, Ahmedabad"),
            ("MA Chidambaram Stadium, Chepauk", "MA Chidambaram Stadium, Chennai"),
            ("Dr. D.Y. Patil Sports Academy", "Dr DY Patil Sports Academy, Mumbai"),
            ("EDEN GARDENS", "Eden Gardens, Kolkata"),
        ];
        for (raw, want) in cases {
            let once = canonicalize_venue(raw);
            assert_eq!(once, want, "raw venue {raw:?}");
            assert_eq!(canonicalize_venue(&once), once, "raw venue {raw:?}");
        }
    }

    #[test]
    fn unmatched_venue_is_kept_as_is() {
        assert_eq!(canonicalize_venue("  Newlands, Cape Town "), "Newlands, Cape Town");
        assert_eq!(canonicalize_venue("Kingsmead"), "Kingsmead");
        for raw in ["  Newlands, Cape Town ", "\tKingsmead\n", "Dubai Sports City  "] {
            let once = canonicalize_venue(raw);
            assert_eq!(canonicalize_venue(&once), once);
        }
    }

    #[test]
    fn canonical_names_are_fixed_points() {
        for rule in VENUE_RULES {
            let once = canonicalize_venue(rule.canonical);
            assert_eq!(once, rule.canonical);
            assert_eq!(canonicalize_venue(&once), once);
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        const GENERIC_FIRST: &[VenueRule] = &[
            VenueRule {
                canonical: "Somewhere, Mumbai",
                any_of: &[&["mumbai"]],
            },
            VenueRule {
                canonical: "Wankhede Stadium, Mumbai",
                any_of: &[&["wankhede"]],
            },
        ];
        assert_eq!(
            canonicalize_with(GENERIC_FIRST, "Wankhede Stadium, Mumbai"),
            "Somewhere, Mumbai"
        );
        assert_eq!(
            canonicalize_with(&GENERIC_FIRST[1..], "Wankhede Stadium, Mumbai"),
            "Wankhede Stadium, Mumbai"
        );
    }

    #[test]
    fn compound_keywords_need_every_term() {
        assert_eq!(canonicalize_venue("Dubai Sports City"), "Dubai Sports City");
        assert_eq!(
            canonicalize_venue("Dubai International Stadium"),
            "Dubai International Cricket Stadium"
        );
    }
}
