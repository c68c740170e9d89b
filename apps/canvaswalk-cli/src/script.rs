use anyhow::{Context, Result, bail};
use canvaswalk_driver::ScriptedHost;
use canvaswalk_input::{Action, KeyBindings, KeyCode};
use std::str::FromStr;

/// A held action over an inclusive frame range, written `ACTION:FROM-TO`
/// (or `ACTION:FRAME` for a single frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldSpec {
    pub action: Action,
    pub from: u32,
    pub to: u32,
}

impl FromStr for HoldSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, frames) = s
            .split_once(':')
            .with_context(|| format!("expected ACTION:FROM-TO, got {s:?}"))?;
        let action = match name.trim() {
            "left" => Action::MoveLeft,
            "right" => Action::MoveRight,
            "abort" => Action::Abort,
            other => bail!("unknown action {other:?} (use left, right or abort)"),
        };
        let (from, to) = match frames.split_once('-') {
            Some((a, b)) => (a.trim().parse::<u32>()?, b.trim().parse::<u32>()?),
            None => {
                let f = frames.trim().parse::<u32>()?;
                (f, f)
            }
        };
        if from == 0 || to < from {
            bail!("frame range {from}-{to} must start at 1 and not run backwards");
        }
        Ok(Self { action, from, to })
    }
}

/// Script `holds` onto `host` using the first key code bound to each action.
pub fn apply(host: ScriptedHost, holds: &[HoldSpec], bindings: &KeyBindings) -> Result<ScriptedHost> {
    holds.iter().try_fold(host, |host, spec| {
        let code: KeyCode = bindings
            .codes_for(spec.action)
            .next()
            .with_context(|| format!("no key bound to {:?}", spec.action))?;
        Ok::<_, anyhow::Error>(host.hold(code, spec.from, spec.to))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ranges_and_single_frames() {
        let spec: HoldSpec = "right:1-3".parse().unwrap();
        assert_eq!(
            spec,
            HoldSpec {
                action: Action::MoveRight,
                from: 1,
                to: 3
            }
        );
        let single: HoldSpec = "abort:7".parse().unwrap();
        assert_eq!((single.from, single.to), (7, 7));
    }

    #[test]
    fn rejects_bad_specs() {
        assert!("jump:1-2".parse::<HoldSpec>().is_err());
        assert!("left:0-2".parse::<HoldSpec>().is_err());
        assert!("left:5-2".parse::<HoldSpec>().is_err());
        assert!("left".parse::<HoldSpec>().is_err());
    }

    #[test]
    fn unbound_action_is_an_error() {
        let host = ScriptedHost::new(std::time::Duration::from_millis(16));
        let spec: HoldSpec = "left:1-2".parse().unwrap();
        assert!(apply(host, &[spec], &KeyBindings::empty()).is_err());
    }

    #[test]
    fn open_ended_hold_applies() {
        use canvaswalk_driver::FrameHost;
        use canvaswalk_input::{ActionState, BoundInput, InputLatch};

        let spec: HoldSpec = "right:1-4294967295".parse().unwrap();
        let host = ScriptedHost::new(std::time::Duration::from_millis(16)).close_after(2);
        let bindings = KeyBindings::default();
        let mut host = apply(host, &[spec], &bindings).unwrap();
        host.attach_input().unwrap();
        let mut latch = InputLatch::new();
        while host.next_frame().unwrap().is_some() {
            host.pump_input(&mut latch).unwrap();
        }
        assert!(BoundInput::new(&latch, &bindings).is_active(Action::MoveRight));
    }
}
