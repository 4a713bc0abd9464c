use crate::error::ExpansionError;
use crate::graph::Entity;
use chgraph_scanner::{EntityKind, SearchState};

/// Decide which page to fetch next for a clicked entity.
///
/// | kind      | state            | next page                |
/// |-----------|------------------|--------------------------|
/// | officer   | `unsearched`     | secondary (appointments) |
/// | company   | `unsearched`     | primary (detail)         |
/// | company   | `primary-only`   | secondary                |
/// | company   | `secondary-only` | primary                  |
/// | any       | `complete`       | rejected                 |
/// | person    | any              | rejected                 |
///
/// An officer in a partial state is rejected as invalid: only a resolved
/// company can be partially searched.
pub fn next_action(entity: &Entity) -> Result<String, ExpansionError> {
    let name = || entity.name.clone();

    let url = match (entity.kind, entity.search_state) {
        (EntityKind::Person, _) => return Err(ExpansionError::NotSearchable { name: name() }),
        (_, SearchState::Complete) => return Err(ExpansionError::AlreadySearched { name: name() }),
        (EntityKind::Officer, SearchState::Unsearched) => &entity.secondary_url,
        (EntityKind::Officer, state @ (SearchState::PrimaryOnly | SearchState::SecondaryOnly)) => {
            return Err(ExpansionError::InvalidState {
                name: name(),
                kind: entity.kind,
                state,
            });
        }
        (EntityKind::Company, SearchState::Unsearched | SearchState::SecondaryOnly) => {
            &entity.primary_url
        }
        (EntityKind::Company, SearchState::PrimaryOnly) => &entity.secondary_url,
    };

    url.clone().ok_or(ExpansionError::MissingUrl { name: name() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chgraph_scanner::RelationStatus;

    const PRIMARY: &str = "https://beta.companieshouse.gov.uk/company/01234567";
    const SECONDARY: &str = "https://beta.companieshouse.gov.uk/officers/abc/appointments";

    fn entity(kind: EntityKind, search_state: SearchState) -> Entity {
        Entity {
            name: "X".to_string(),
            kind,
            search_state,
            primary_url: Some(PRIMARY.to_string()),
            secondary_url: Some(SECONDARY.to_string()),
            status: RelationStatus::Unknown,
            attributes: Vec::new(),
        }
    }

    #[test]
    fn test_officer_unsearched_fetches_appointments() {
        let e = entity(EntityKind::Officer, SearchState::Unsearched);
        assert_eq!(next_action(&e).unwrap(), SECONDARY);
    }

    #[test]
    fn test_officer_complete_already_searched() {
        let e = entity(EntityKind::Officer, SearchState::Complete);
        assert!(matches!(next_action(&e), Err(ExpansionError::AlreadySearched { .. })));
    }

    #[test]
    fn test_officer_partial_state_invalid() {
        for state in [SearchState::PrimaryOnly, SearchState::SecondaryOnly] {
            let e = entity(EntityKind::Officer, state);
            assert_eq!(
                next_action(&e),
                Err(ExpansionError::InvalidState {
                    name: "X".to_string(),
                    kind: EntityKind::Officer,
                    state,
                })
            );
        }
    }

    #[test]
    fn test_company_states() {
        let e = entity(EntityKind::Company, SearchState::Unsearched);
        assert_eq!(next_action(&e).unwrap(), PRIMARY);

        let e = entity(EntityKind::Company, SearchState::PrimaryOnly);
        assert_eq!(next_action(&e).unwrap(), SECONDARY);

        let e = entity(EntityKind::Company, SearchState::SecondaryOnly);
        assert_eq!(next_action(&e).unwrap(), PRIMARY);

        let e = entity(EntityKind::Company, SearchState::Complete);
        assert!(matches!(next_action(&e), Err(ExpansionError::AlreadySearched { .. })));
    }

    #[test]
    fn test_person_never_searchable() {
        for state in [
            SearchState::Unsearched,
            SearchState::PrimaryOnly,
            SearchState::SecondaryOnly,
            SearchState::Complete,
        ] {
            let e = entity(EntityKind::Person, state);
            assert!(matches!(next_action(&e), Err(ExpansionError::NotSearchable { .. })));
        }
    }

    #[test]
    fn test_missing_url() {
        let mut e = entity(EntityKind::Company, SearchState::PrimaryOnly);
        e.secondary_url = None;
        assert_eq!(
            next_action(&e),
            Err(ExpansionError::MissingUrl { name: "X".to_string() })
        );
    }
}
