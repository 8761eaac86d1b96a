mod keys;
mod lifecycle;
mod round_trip;
mod serialization;

use crate::{SchemeKind, Session, SessionConfig};

pub(crate) fn keyed_session(scheme: SchemeKind) -> Session {
    let config: SessionConfig = SessionConfig {
        scheme,
        ..SessionConfig::default()
    };
    let mut session: Session = Session::new(config).unwrap();
    assert!(session.parameters_set());
    session.generate_keys().unwrap();
    session
}
