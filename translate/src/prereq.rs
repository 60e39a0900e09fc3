// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cross-field prerequisites, checked after capability admission and before population.

use crate::error::CompatError;
use crate::presence::MatchFields;
use net::IpProto;
use ofdpa::TableId;
use openflow::Match;

/// Transport port dimensions and the IP protocol owning their namespace.
const PORT_OWNERS: [(MatchFields, &str, IpProto); 6] = [
    (MatchFields::TCP_SRC, "tcp_src", IpProto::TCP),
    (MatchFields::TCP_DST, "tcp_dst", IpProto::TCP),
    (MatchFields::UDP_SRC, "udp_src", IpProto::UDP),
    (MatchFields::UDP_DST, "udp_dst", IpProto::UDP),
    (MatchFields::SCTP_SRC, "sctp_src", IpProto::SCTP),
    (MatchFields::SCTP_DST, "sctp_dst", IpProto::SCTP),
];

/// Check the table-specific prerequisites of `request`.
///
/// On the policy ACL table a transport port match requires an exact `ip_proto` match on the
/// protocol owning that port. Other tables have no prerequisites.
///
/// # Errors
///
/// [`CompatError::Prerequisite`] naming the first offending port dimension.
pub fn validate_prerequisites(
    request: &Match,
    present: MatchFields,
    table: TableId,
) -> Result<(), CompatError> {
    if table != TableId::AclPolicy {
        return Ok(());
    }
    let proto = present
        .contains(MatchFields::IP_PROTO)
        .then_some(request.ip_proto)
        .filter(|p| p.is_exact())
        .map(|p| p.value);
    for (flag, field, expected) in PORT_OWNERS {
        if present.contains(flag) && proto != Some(expected.raw()) {
            return Err(CompatError::Prerequisite {
                field,
                expected,
                got: proto,
            });
        }
    }
    Ok(())
}
