//
//   This Source Code Form is subject to the terms of the Mozilla Public
//   License, v. 2.0. If a copy of the MPL was not distributed with this
//   file, You can obtain one at http://mozilla.org/MPL/2.0/.
//

use std::num::NonZeroU16;
use std::time::Duration;

/// The keep alive announced in CONNECT
///
/// The client only announces it, no PINGREQ is ever scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAlive {
    Disabled,
    Seconds(NonZeroU16),
}

impl KeepAlive {
    pub const DEFAULT_SECONDS: u16 = 30;

    pub(crate) fn as_u16(&self) -> u16 {
        match self {
            KeepAlive::Disabled => 0,
            KeepAlive::Seconds(s) => s.get(),
        }
    }
}

impl Default for KeepAlive {
    fn default() -> Self {
        match NonZeroU16::new(Self::DEFAULT_SECONDS) {
            Some(secs) => KeepAlive::Seconds(secs),
            None => KeepAlive::Disabled,
        }
    }
}

impl From<u16> for KeepAlive {
    fn from(secs: u16) -> Self {
        NonZeroU16::new(secs)
            .map(KeepAlive::Seconds)
            .unwrap_or(KeepAlive::Disabled)
    }
}

impl TryFrom<Duration> for KeepAlive {
    type Error = KeepAliveError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        let secs = value.as_secs();
        if secs > u16::MAX.into() {
            return Err(KeepAliveError::OutOfBounds);
        }
        let secs = secs as u16;

        Ok(KeepAlive::Seconds(NonZeroU16::try_from(secs)?))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KeepAliveError {
    #[error("KeepAlive cannot be of zero duration")]
    KeepAliveZero(#[from] std::num::TryFromIntError),

    #[error("KeepAlive out of bounds, maximum is {} seconds", u16::MAX)]
    OutOfBounds,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::KeepAlive;
    use super::KeepAliveError;

    #[test]
    fn default_is_thirty_seconds() {
        assert_eq!(KeepAlive::default().as_u16(), 30);
    }

    #[test]
    fn zero_seconds_disables() {
        assert_eq!(KeepAlive::from(0), KeepAlive::Disabled);
        assert_eq!(KeepAlive::Disabled.as_u16(), 0);
        assert_eq!(KeepAlive::from(90).as_u16(), 90);
    }

    #[test]
    fn durations_are_bounded() {
        assert_eq!(
            KeepAlive::try_from(Duration::from_secs(120)).unwrap().as_u16(),
            120
        );
        assert!(matches!(
            KeepAlive::try_from(Duration::from_secs(0)),
            Err(KeepAliveError::KeepAliveZero(_))
        ));
        assert!(matches!(
            KeepAlive::try_from(Duration::from_secs(u64::from(u16::MAX) + 1)),
            Err(KeepAliveError::OutOfBounds)
        ));
    }
}
