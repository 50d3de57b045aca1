use crate::UNREADABLE_AUTHORITY;
use crate::platform::bundle::keys;
use crate::platform::{CodeSigningPlatform, ObjectKind, PropertyBundle};
use crate::report::model::Authority;

/// Map the trust object of a signing information bundle to authorities.
///
/// Returns an empty list when the bundle carries no trust object, when the
/// object is of another type, or when the trust engine exposes no
/// properties. Chain order is kept as reported.
pub fn extract_authorities<P: CodeSigningPlatform>(
    platform: &P,
    info: &PropertyBundle<P::Object>,
) -> Vec<Authority> {
    let Some(trust) = info
        .get_object(keys::TRUST)
        .filter(|obj| platform.object_kind(obj) == ObjectKind::Trust)
    else {
        return Vec::new();
    };

    let Some(certificates) = platform.copy_trust_properties(trust) else {
        tracing::debug!("trust object exposed no certificate properties");
        return Vec::new();
    };

    certificates.iter().map(authority_from_properties).collect()
}

/// Build one authority from a per-certificate property map.
///
/// A certificate without a title gets [`UNREADABLE_AUTHORITY`] as its name,
/// and as its error unless the map supplies one.
pub fn authority_from_properties<O>(properties: &PropertyBundle<O>) -> Authority {
    let warning = properties
        .get_str(keys::PROPERTY_WARNING)
        .map(str::to_string);
    let error = properties.get_str(keys::PROPERTY_ERROR).map(str::to_string);

    match properties.get_str(keys::PROPERTY_TITLE) {
        Some(title) => Authority {
            name: title.to_string(),
            warning,
            error,
        },
        None => Authority {
            name: UNREADABLE_AUTHORITY.to_string(),
            warning,
            error: Some(error.unwrap_or_else(|| UNREADABLE_AUTHORITY.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Value;
    use crate::platform::recorded::{RecordedObject, RecordedPlatform};

    fn cert(title: &str) -> PropertyBundle<RecordedObject> {
        PropertyBundle::new().with(keys::PROPERTY_TITLE, title)
    }

    fn bundle_with_trust(trust: RecordedObject) -> PropertyBundle<RecordedObject> {
        PropertyBundle::new().with(keys::TRUST, Value::Object(trust))
    }

    #[test]
    fn preserves_chain_order_and_duplicates() {
        let chain = vec![
            cert("Developer ID Application: Example Corp"),
            cert("Developer ID Certification Authority"),
            cert("Apple Root CA"),
            cert("Apple Root CA"),
        ];
        let info = bundle_with_trust(RecordedObject::Trust(Some(chain)));

        let names: Vec<String> = extract_authorities(&RecordedPlatform::new(), &info)
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "Developer ID Application: Example Corp",
                "Developer ID Certification Authority",
                "Apple Root CA",
                "Apple Root CA",
            ]
        );
    }

    #[test]
    fn missing_trust_yields_empty_list() {
        let info = PropertyBundle::<RecordedObject>::new();

        assert!(extract_authorities(&RecordedPlatform::new(), &info).is_empty());
    }

    #[test]
    fn wrongly_typed_trust_yields_empty_list() {
        let info = bundle_with_trust(RecordedObject::Requirement(Ok("anchor apple".into())));

        assert!(extract_authorities(&RecordedPlatform::new(), &info).is_empty());
    }

    #[test]
    fn unreadable_trust_properties_yield_empty_list() {
        let info = bundle_with_trust(RecordedObject::Trust(None));

        assert!(extract_authorities(&RecordedPlatform::new(), &info).is_empty());
    }

    #[test]
    fn keeps_warning_and_error_annotations() {
        let props = cert("Apple Root CA")
            .with(keys::PROPERTY_WARNING, "expires soon")
            .with(keys::PROPERTY_ERROR, "revoked");

        let authority = authority_from_properties(&props);

        assert_eq!(authority.name, "Apple Root CA");
        assert_eq!(authority.warning.as_deref(), Some("expires soon"));
        assert_eq!(authority.error.as_deref(), Some("revoked"));
    }

    #[test]
    fn titled_certificate_without_error_has_none() {
        let authority = authority_from_properties(&cert("Apple Root CA"));

        assert_eq!(authority.error, None);
        assert_eq!(authority.warning, None);
    }

    #[test]
    fn missing_title_falls_back_for_name_and_error() {
        let props = PropertyBundle::<RecordedObject>::new().with(keys::PROPERTY_TITLE, 7i64);

        let authority = authority_from_properties(&props);

        assert_eq!(authority.name, UNREADABLE_AUTHORITY);
        assert_eq!(authority.error.as_deref(), Some(UNREADABLE_AUTHORITY));
    }

    #[test]
    fn missing_title_keeps_explicit_error() {
        let props = PropertyBundle::<RecordedObject>::new().with(keys::PROPERTY_ERROR, "expired");

        let authority = authority_from_properties(&props);

        assert_eq!(authority.name, UNREADABLE_AUTHORITY);
        assert_eq!(authority.error.as_deref(), Some("expired"));
    }
}
