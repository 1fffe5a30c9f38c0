#![no_std]
#![no_main]

use defmt::info;
use pse84_attest::{halt, App, Config};
use pse84_evk::Pse84;
use {defmt_rtt as _, panic_probe as _};

#[cortex_m_rt::entry]
fn main() -> ! {
    let (platform, token) = defmt::unwrap!(Pse84::take());
    info!("CM33 non-secure application started");

    match App::new(platform, Config::default()).run(token) {
        Ok(never) => match never {},
        Err(e) => halt(e),
    }
}
