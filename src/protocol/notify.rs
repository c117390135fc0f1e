use std::sync::Arc;

use super::clients::ClientFeed;
use super::push::PushSender;
use super::server::ControlChannel;
use crate::context::AppContext;
use crate::facility::FacilityKind;
use crate::output::facility_list;
use crate::supervisor::RelayEvents;

const FLIGHT_PLAN_LOADED: &str = "FM_FP_LOADED";

/// Forwards supervisor events to clients
///
/// Facility lists go back over the control socket to the last requester;
/// flight plan notices go to the primary map client on its feed port.
pub struct ClientNotifier {
    ctx: Arc<AppContext>,
    control: Arc<ControlChannel>,
    push: Arc<PushSender>,
}

impl ClientNotifier {
    pub fn new(ctx: Arc<AppContext>, control: Arc<ControlChannel>, push: Arc<PushSender>) -> Self {
        Self { ctx, control, push }
    }
}

impl RelayEvents for ClientNotifier {
    fn facilities_updated(&self, kind: FacilityKind) {
        let records = self.ctx.facilities.get(kind).snapshot();
        let message = facility_list(kind, &records);
        if self.control.send_to_last_requester(&message) {
            log::info!("Sent {} {}", records.len(), kind);
        } else {
            log::debug!("No requester for {} list", kind);
        }
    }

    fn flight_plan_loaded(&self) {
        match self
            .push
            .push(&self.ctx.clients, ClientFeed::Map, FLIGHT_PLAN_LOADED)
        {
            Ok(true) => log::info!("Notified map client of new flight plan"),
            Ok(false) => log::debug!("No map client to notify of flight plan"),
            Err(e) => log::warn!("{}", e),
        }
    }
}
