#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate wm8816;
use wm8816::*;

use std::process::exit;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn get_byte(matches: &clap::ArgMatches, name: &str) -> AResult<u8> {
	match matches.value_of(name) {
		Some(p) => parse_byte(p).map_err(|e| {
			let msg = format!("invalid parameter {}: {}", name, e);
			e.context(msg).into()
		}),
		None => bail!("missing parameter {}", name),
	}
}

fn run_command<G: gpio::Gpio>(wm: &mut Wm8816<G>, matches: &clap::ArgMatches) -> AResult<()> {
	match matches.subcommand() {
		("init", _) => {
			// already done unless --skip_init
			if matches.is_present("skip_init") {
				wm.initialize();
			}
		},
		("write", Some(sub_m)) => {
			let register = get_byte(sub_m, "REGISTER")?;
			let value = get_byte(sub_m, "VALUE")?;
			wm.write_register(register, value);
		},
		("read", Some(sub_m)) => {
			let register = get_byte(sub_m, "REGISTER")?;
			println!("0x{:02x}", wm.read_register(register));
		},
		("mute", _) => {
			wm.mute();
		},
		("unmute", _) => {
			wm.unmute();
		},
		("gain", Some(sub_m)) => {
			let channel: Channel = get_param(sub_m, "CHANNEL")?;
			if sub_m.is_present("VALUE") {
				let gain = get_byte(sub_m, "VALUE")?;
				wm.set_gain(channel, gain);
				info!("{} channel gain set to 0x{:02x}", channel, gain);
			} else {
				match wm.gain(channel) {
					Some(gain) => println!("0x{:02x}", gain),
					None => bail!("gain of {} channels can't be read back", channel),
				}
			}
		},
		("peak", _) => {
			println!("{:?}", wm.peak_status());
		},
		("peak_reference", Some(sub_m)) => {
			let reference = get_byte(sub_m, "VALUE")?;
			wm.set_peak_reference(reference);
		},
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
	Ok(())
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg pins: -p --pins +takes_value +required "GPIO numbers wired to the chip: CS,MUTE,DATA,CLOCK")
		(@arg skip_init: --skip_init "don't initialize the pins before running the command")
		(@arg keep: -k --keep "leave the GPIOs exported on exit")
		(@subcommand init =>
			(about: "configure pins: chip deselected, unmuted")
		)
		(@subcommand write =>
			(about: "write a raw register")
			(@arg REGISTER: +required "register address (decimal, 0x.. or 0b..)")
			(@arg VALUE: +required "value to write")
		)
		(@subcommand read =>
			(about: "read a raw register")
			(@arg REGISTER: +required "register address (decimal, 0x.. or 0b..)")
		)
		(@subcommand mute =>
			(about: "pull MUTEB low")
		)
		(@subcommand unmute =>
			(about: "pull MUTEB high")
		)
		(@subcommand gain =>
			(about: "show or set channel gain (0x00 mute, 0xe0 0 dB, 0xff max)")
			(@arg CHANNEL: +required "left, right or both")
			(@arg VALUE: "new gain; shows the current gain if missing")
		)
		(@subcommand peak =>
			(about: "show peak detector status")
		)
		(@subcommand peak_reference =>
			(about: "set peak detector reference level")
			(@arg VALUE: +required "reference level")
		)
	).get_matches();

	let pins: Pins = get_param(&matches, "pins")?;
	let gpio = gpio::SysfsGpio::open(&pins.all())?;
	let mut wm = Wm8816::new(gpio, pins);

	if !matches.is_present("skip_init") {
		wm.initialize();
	}

	let result = run_command(&mut wm, &matches);

	let (mut gpio, _) = wm.release();
	if matches.is_present("keep") {
		gpio.keep_exported();
	}

	result
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}
