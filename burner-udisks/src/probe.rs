// SPDX-License-Identifier: GPL-3.0-only

//! UDisks2-backed drive probe

use async_trait::async_trait;
use zbus::Connection;

use burner_media::{DriveDetails, DriveProbe, MediumDetails, ProbeError};

use crate::map;
use crate::proxies::UDisks2DriveProxy;

/// [`DriveProbe`] over the UDisks2 Drive interface. Device identity is the
/// UDisks2 drive object path, the same string the notification source
/// hands out.
pub struct UdisksProbe {
    connection: Connection,
}

impl UdisksProbe {
    pub async fn new() -> anyhow::Result<Self> {
        let connection = Connection::system().await?;
        Ok(Self { connection })
    }

    pub fn with_connection(connection: Connection) -> Self {
        Self { connection }
    }

    async fn proxy(&self, device: &str) -> Result<UDisks2DriveProxy<'_>, ProbeError> {
        UDisks2DriveProxy::builder(&self.connection)
            .path(device.to_string())
            .map_err(|e| backend(device, e))?
            .build()
            .await
            .map_err(|e| backend(device, e))
    }

    async fn read_medium(
        &self,
        proxy: &UDisks2DriveProxy<'_>,
        device: &str,
    ) -> Result<Option<MediumDetails>, ProbeError> {
        if !proxy.media_available().await.map_err(|e| backend(device, e))? {
            return Ok(None);
        }

        let profile = proxy.media().await.map_err(|e| backend(device, e))?;
        let blank = proxy
            .optical_blank()
            .await
            .map_err(|e| backend(device, e))?;
        let size = proxy.size().await.map_err(|e| backend(device, e))?;

        let Some(status) = map::medium_status(&profile, blank) else {
            tracing::debug!("{} holds unsupported media {:?}", device, profile);
            return Ok(None);
        };

        let (free_bytes, used_bytes) = if blank { (size, 0) } else { (0, size) };

        Ok(Some(MediumDetails {
            status,
            free_bytes,
            used_bytes,
            label: None,
        }))
    }
}

#[async_trait]
impl DriveProbe for UdisksProbe {
    async fn probe_drive(&self, device: &str) -> Result<DriveDetails, ProbeError> {
        let proxy = self.proxy(device).await?;

        if !proxy.optical().await.map_err(|e| backend(device, e))? {
            return Err(ProbeError::NotOptical(device.to_string()));
        }

        let vendor = proxy.vendor().await.map_err(|e| backend(device, e))?;
        let model = proxy.model().await.map_err(|e| backend(device, e))?;
        let compatibility = proxy
            .media_compatibility()
            .await
            .map_err(|e| backend(device, e))?;
        let medium = self.read_medium(&proxy, device).await?;

        Ok(DriveDetails {
            vendor,
            model,
            can_write: map::compatibility_can_write(&compatibility),
            can_read: true,
            medium,
        })
    }

    async fn probe_medium(&self, device: &str) -> Result<Option<MediumDetails>, ProbeError> {
        let proxy = self.proxy(device).await?;
        self.read_medium(&proxy, device).await
    }
}

fn backend(device: &str, error: zbus::Error) -> ProbeError {
    ProbeError::Unresponsive {
        device: device.to_string(),
        reason: error.to_string(),
    }
}
