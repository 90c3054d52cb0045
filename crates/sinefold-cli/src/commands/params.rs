//! Parameter listing command.

use clap::Args;
use sinefold_synth::{ParamId, ParamScale};

#[derive(Args)]
pub struct ParamsArgs {
    /// Only list parameters whose name starts with this prefix (e.g. `echo`)
    filter: Option<String>,
}

fn unit(scale: ParamScale) -> &'static str {
    match scale {
        ParamScale::Cutoff => "Hz",
        ParamScale::Shelf | ParamScale::Drive | ParamScale::Tilt | ParamScale::Attenuation => {
            "dB"
        }
        ParamScale::Semitones => "st",
        ParamScale::Phase => "turns",
        ParamScale::DecayTime | ParamScale::DelayTime => "s",
        ParamScale::FilterCycle => "button",
        ParamScale::Resonance
        | ParamScale::Unit
        | ParamScale::Bipolar
        | ParamScale::Fluctuation
        | ParamScale::Spread => "",
    }
}

fn matching(filter: Option<&str>) -> impl Iterator<Item = ParamId> + '_ {
    ParamId::all().filter(move |id| filter.is_none_or(|f| id.to_string().starts_with(f)))
}

pub fn run(args: ParamsArgs) -> anyhow::Result<()> {
    println!(
        "{:<26} {:<12} {:>10} {:>10} {:>10}  Unit",
        "Parameter", "Scale", "CC 0", "CC 64", "CC 127"
    );
    println!("{}", "-".repeat(80));

    let mut count = 0;
    for id in matching(args.filter.as_deref()) {
        let scale = id.scale();
        if scale == ParamScale::FilterCycle {
            println!(
                "{:<26} {:<12} {:>10} {:>10} {:>10}  {}",
                id.to_string(),
                format!("{scale:?}"),
                "-",
                "step",
                "step",
                unit(scale)
            );
        } else {
            println!(
                "{:<26} {:<12} {:>10.3} {:>10.3} {:>10.3}  {}",
                id.to_string(),
                format!("{scale:?}"),
                scale.apply(0),
                scale.apply(64),
                scale.apply(127),
                unit(scale)
            );
        }
        count += 1;
    }

    if count == 0 {
        anyhow::bail!(
            "no parameter starts with '{}'",
            args.filter.unwrap_or_default()
        );
    }
    println!("\n{count} parameter(s). Use `--set NAME=VALUE` with natural units.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_selects_group() {
        assert_eq!(matching(Some("echo")).count(), 6);
        assert_eq!(matching(Some("osc_")).count(), 24);
        assert_eq!(matching(None).count(), ParamId::all().count());
        assert_eq!(matching(Some("nothing")).count(), 0);
    }
}
