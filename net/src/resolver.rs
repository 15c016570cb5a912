use {
    crate::{
        error::ResolutionError,
        network::{AddressCandidate, Hints, Network},
    },
    tracing::log,
};

/// Resolves `host` (or the wildcard address when `host` is `None` and the
/// hints are passive) into candidates in the order the resolver prefers.
///
/// Never returns an empty list: a resolution without usable addresses is
/// reported as [`ResolutionError::NoData`].
pub fn resolve<N: Network>(
    network: &N,
    host: Option<&str>,
    service: &str,
    hints: &Hints,
) -> Result<Vec<AddressCandidate>, ResolutionError> {
    let target = host.unwrap_or("<wildcard>");
    let candidates = network.resolve(host, service, hints).map_err(|e| {
        log::warn!("unable to resolve {target}:{service}: {e}");
        e
    })?;

    if candidates.is_empty() {
        log::warn!("{target}:{service} resolved to no usable addresses");
        return Err(ResolutionError::NoData);
    }

    log::debug!(
        "{target}:{service} resolved to {}",
        candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            network::AddressFamily,
            testing::{candidate, Call, ScriptedNetwork},
        },
    };

    #[test]
    fn preserves_resolver_order() {
        let expected = vec![candidate(3, 6666), candidate(1, 6666), candidate(2, 6666)];
        let network = ScriptedNetwork::new(expected.clone());
        let hints = Hints::active(Some(AddressFamily::Ipv4));

        assert_eq!(
            Ok(expected),
            resolve(&network, Some("example"), "6666", &hints)
        );
        assert_eq!(
            vec![Call::Resolve(
                Some("example".to_owned()),
                "6666".to_owned(),
                hints
            )],
            network.calls()
        );
    }

    #[test]
    fn empty_resolution_is_no_data() {
        let network = ScriptedNetwork::new(Vec::new());
        assert_eq!(
            Err(ResolutionError::NoData),
            resolve(&network, None, "6666", &Hints::passive(None))
        );
    }

    #[test]
    fn unknown_name_yields_no_candidates() {
        let network = ScriptedNetwork::resolving(Err(ResolutionError::NameNotFound));
        assert_eq!(
            Err(ResolutionError::NameNotFound),
            resolve(&network, Some("nowhere"), "6666", &Hints::active(None))
        );
        assert!(network.created().is_empty());
    }
}
