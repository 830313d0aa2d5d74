//! Adaptive data rate: uplink bookkeeping and the LinkADRReq decision taken on the next downlink.

use super::message::{replace_link_adr_req, DownlinkMessage, GatewayMetadata, UplinkMessage};
use super::region::{self, Bands, FrequencyPlan};
use super::types::*;
use crate::channel_mask::ChannelMask;
use crate::device::frames_store::FramesStore;
use crate::device::Device;
use crate::encoding::maccommandcreator::LinkADRReqCreator;
use crate::encoding::maccommands::{MacCommand, Redundancy};
use crate::{encoding, Error};

/// Best SNR among the gateways that received an uplink, 0 when none did.
pub fn best_snr(gateways: &[GatewayMetadata]) -> f32 {
    gateways.iter().map(|gw| gw.snr).reduce(f32::max).unwrap_or(0.0)
}

/// Highest SNR of the window, 0 for an empty window.
pub fn max_snr(frames: &[Frame]) -> f32 {
    frames.iter().map(|frame| frame.snr).reduce(f32::max).unwrap_or(0.0)
}

/// Share of uplinks lost over a newest-first window, in percent rounded half up.
///
/// Counters are compared with serial number arithmetic: a window spanning the 32-bit wrap is
/// measured normally, while a newest counter behind the oldest one (a device reset) counts as no
/// loss.
pub fn loss_percentage(frames: &[Frame]) -> u32 {
    let (Some(newest), Some(oldest)) = (frames.first(), frames.last()) else {
        return 0;
    };
    let span = newest.f_cnt.wrapping_sub(oldest.f_cnt);
    if span > i32::MAX as u32 {
        return 0;
    }
    let sent = u64::from(span) + 1;
    let lost = sent.saturating_sub(frames.len() as u64);
    ((200 * lost + sent) / (2 * sent)) as u32
}

/// Number of transmissions suited to a loss percentage, starting from the current one.
pub fn adjust_nb_trans(nb_trans: u8, loss_percentage: u32) -> u8 {
    let delta: i16 = match loss_percentage {
        0..=5 => -1,
        6..=10 => 0,
        11..=30 => 1,
        _ => 2,
    };
    (i16::from(nb_trans) + delta).clamp(MIN_NB_TRANS.into(), MAX_NB_TRANS.into()) as u8
}

/// Records an uplink in the ADR state of `device`.
///
/// With the ADR bit set, the uplink joins the frame history and a LinkADRReq is scheduled when
/// the data rate changed or the device asked for one (which also forces `response` out). With the
/// ADR bit clear, the history is dropped and the ADR settings reset.
pub fn handle_uplink_adr<S>(
    store: &mut S,
    device: &mut Device,
    uplink: &UplinkMessage<'_>,
    response: &mut DownlinkMessage,
) -> Result<(), Error<S::Error>>
where
    S: FramesStore,
{
    if !uplink.adr {
        store.clear(&device.id).map_err(Error::Store)?;
        debug!("ADR disabled, history cleared for {:?}", device.id.dev_eui);
        let adr = &mut device.adr;
        adr.send_req = false;
        adr.data_rate = None;
        adr.tx_power = None;
        adr.nb_trans = None;
        return Ok(());
    }

    let frame = Frame {
        f_cnt: uplink.f_cnt,
        snr: best_snr(uplink.gateways),
        gateway_count: uplink.gateways.len() as u32,
    };
    if let Err(err) = store.push(&device.id, frame) {
        error!("could not push frame for {:?}: {:?}", device.id.dev_eui, err);
    }

    let adr = &mut device.adr;
    if adr.band.is_none() {
        adr.band = Some(uplink.band.clone());
    }
    if adr.data_rate.as_ref() != Some(&uplink.data_rate) {
        adr.data_rate = Some(uplink.data_rate.clone());
        adr.send_req = true;
    }
    if uplink.adr_ack_req {
        adr.send_req = true;
        response.ack = true;
    }
    Ok(())
}

/// Appends a LinkADRReq to `downlink` when the history of `device` calls for new settings.
///
/// Missing margin, TX power and number of transmissions are defaulted and kept on the device
/// along the way. The command and the new FOpts are built before the device settings are
/// committed, so on error both `downlink` and the settings are left as they were.
pub fn handle_downlink_adr<S, B>(
    store: &S,
    bands: &B,
    config: &AdrConfig,
    device: &mut Device,
    downlink: &mut DownlinkMessage,
) -> Result<(), Error<S::Error>>
where
    S: FramesStore,
    B: Bands + ?Sized,
{
    if !device.adr.send_req {
        return Ok(());
    }
    if device.adr.failed > 0 {
        trace!("skipping ADR, {} rejected requests", device.adr.failed);
        return Ok(());
    }

    let history = store.get(&device.id).map_err(Error::Store)?;
    if history.len() < FRAMES_HISTORY_SIZE {
        trace!("skipping ADR, {} frames in history", history.len());
        return Ok(());
    }
    let frames = &history[..FRAMES_HISTORY_SIZE];

    let Some(data_rate) = device.adr.data_rate.clone() else {
        trace!("skipping ADR, no data rate");
        return Ok(());
    };
    let margin = *device.adr.margin.get_or_insert(config.default_margin);
    let Some(band) = device.adr.band.as_ref() else {
        trace!("skipping ADR, no band");
        return Ok(());
    };
    let plan = bands.get(band)?;
    let tx_power = *device.adr.tx_power.get_or_insert(plan.default_tx_power());
    let nb_trans = *device.adr.nb_trans.get_or_insert(MIN_NB_TRANS);

    let (new_data_rate, new_tx_power) =
        match plan.adr_settings(&data_rate, tx_power, max_snr(frames), margin as f32) {
            Ok(settings) => settings,
            Err(region::Error::AdrUnavailable) => {
                debug!("ADR unavailable for {}", data_rate);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
    let data_rate_index = plan.data_rate_index(&new_data_rate)?;
    let tx_power_index = match plan.tx_power_index(new_tx_power) {
        Ok(index) => index,
        Err(_) => {
            warn!("no index for {} dBm, using the default TX power", new_tx_power);
            plan.tx_power_index(plan.default_tx_power()).unwrap_or(0)
        }
    };

    let settings_kept = new_data_rate == data_rate && new_tx_power == tx_power;
    let new_nb_trans = if settings_kept && !device.options.disable_fcnt_check {
        adjust_nb_trans(nb_trans, loss_percentage(frames))
    } else {
        nb_trans
    };
    if settings_kept && new_nb_trans == nb_trans {
        return Ok(());
    }

    let mut creator = LinkADRReqCreator::new();
    creator
        .set_data_rate(data_rate_index)?
        .set_tx_power(tx_power_index)?
        .set_channel_mask(channel_mask(plan, data_rate_index)?)
        .set_redundancy(Redundancy::new(0, new_nb_trans)?);
    let link_adr_req = MacCommand::from_serializable(&creator)?;
    downlink.fopts = replace_link_adr_req(&downlink.fopts, link_adr_req)?;

    info!(
        "LinkADRReq for {:?}: {} at {} dBm, nb_trans {}",
        device.id.dev_eui,
        new_data_rate,
        new_tx_power,
        new_nb_trans
    );
    let adr = &mut device.adr;
    adr.data_rate = Some(new_data_rate);
    adr.tx_power = Some(new_tx_power);
    adr.nb_trans = Some(new_nb_trans);
    Ok(())
}

/// Enables every uplink channel of `plan` that accepts data rate index `data_rate`.
pub fn channel_mask(
    plan: &dyn FrequencyPlan,
    data_rate: u8,
) -> Result<ChannelMask<2>, encoding::Error> {
    let channels = plan.uplink_channels();
    let mut statuses = [false; MAX_UPLINK_CHANNELS];
    if channels.len() > statuses.len() {
        return Err(encoding::Error::TooManyChannels);
    }
    for (status, channel) in statuses.iter_mut().zip(channels) {
        *status = channel.allows(data_rate);
    }
    ChannelMask::from_statuses(&statuses)
}
