/// Live voice session boundary
///
/// The streaming protocol and the audio framing belong to external
/// collaborators. This module only pins down the seam: a transport that
/// carries opaque PCM chunks both ways, and audio devices (microphone plus
/// playback context) that are acquired together when a session starts and
/// released together when it ends, on every path.
use crate::error::{AppError, AppResult};

/// Microphone capture rate expected by the live API
pub const INPUT_SAMPLE_RATE: u32 = 16_000;
/// Playback rate of audio coming back from the live API
pub const OUTPUT_SAMPLE_RATE: u32 = 24_000;

/// Opaque 16-bit PCM audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub data: Vec<u8>,
    pub sample_rate: u32,
}

/// Microphone and playback contexts, handled as one unit
#[cfg_attr(test, mockall::automock)]
pub trait AudioDevices: Send {
    fn acquire(&mut self) -> AppResult<()>;
    fn release(&mut self);
}

/// Bidirectional audio stream to the live model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VoiceTransport: Send {
    async fn open(&mut self, system_instruction: &str) -> AppResult<()>;
    async fn send_audio_chunk(&mut self, chunk: AudioChunk) -> AppResult<()>;
    /// `None` once the remote side has finished
    async fn next_audio_chunk(&mut self) -> AppResult<Option<AudioChunk>>;
    async fn close(&mut self) -> AppResult<()>;
}

/// An open voice session. Devices are released exactly once, by `close` or on drop.
pub struct VoiceSession<T: VoiceTransport, D: AudioDevices> {
    transport: T,
    devices: D,
    released: bool,
}

impl<T: VoiceTransport, D: AudioDevices> VoiceSession<T, D> {
    /// Acquires devices, then opens the transport. A transport that fails to
    /// open releases the devices before the error is returned.
    pub async fn start(mut transport: T, mut devices: D, system_instruction: &str) -> AppResult<Self> {
        devices.acquire()?;

        if let Err(e) = transport.open(system_instruction).await {
            tracing::warn!(error = %e, "Voice session failed to open");
            devices.release();
            return Err(e);
        }

        tracing::info!("Voice session opened");

        Ok(Self {
            transport,
            devices,
            released: false,
        })
    }

    pub async fn send_audio_chunk(&mut self, chunk: AudioChunk) -> AppResult<()> {
        if chunk.sample_rate != INPUT_SAMPLE_RATE {
            return Err(AppError::InvalidInput(format!(
                "Microphone audio must be {} Hz, got {} Hz",
                INPUT_SAMPLE_RATE, chunk.sample_rate
            )));
        }
        self.transport.send_audio_chunk(chunk).await
    }

    pub async fn next_audio_chunk(&mut self) -> AppResult<Option<AudioChunk>> {
        self.transport.next_audio_chunk().await
    }

    /// Closes the transport and releases devices even if closing fails
    pub async fn close(mut self) -> AppResult<()> {
        let result = self.transport.close().await;
        self.release_devices();
        tracing::info!(clean = result.is_ok(), "Voice session closed");
        result
    }

    fn release_devices(&mut self) {
        if !self.released {
            self.devices.release();
            self.released = true;
        }
    }
}

impl<T: VoiceTransport, D: AudioDevices> Drop for VoiceSession<T, D> {
    fn drop(&mut self) {
        self.release_devices();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices_released_once() -> MockAudioDevices {
        let mut devices = MockAudioDevices::new();
        devices.expect_acquire().times(1).returning(|| Ok(()));
        devices.expect_release().times(1).return_const(());
        devices
    }

    fn open_transport() -> MockVoiceTransport {
        let mut transport = MockVoiceTransport::new();
        transport.expect_open().times(1).returning(|_| Ok(()));
        transport
    }

    #[tokio::test]
    async fn test_open_failure_releases_devices() {
        let mut transport = MockVoiceTransport::new();
        transport
            .expect_open()
            .returning(|_| Err(AppError::ExternalApi("handshake rejected".to_string())));

        let result = VoiceSession::start(transport, devices_released_once(), "scholar").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_device_failure_skips_transport() {
        let mut devices = MockAudioDevices::new();
        devices
            .expect_acquire()
            .returning(|| Err(AppError::ExternalApi("microphone permission denied".to_string())));
        devices.expect_release().never();

        let mut transport = MockVoiceTransport::new();
        transport.expect_open().never();

        assert!(VoiceSession::start(transport, devices, "scholar").await.is_err());
    }

    #[tokio::test]
    async fn test_close_releases_devices_once() {
        let mut transport = open_transport();
        transport
            .expect_close()
            .times(1)
            .returning(|| Err(AppError::ExternalApi("already closed".to_string())));

        let session = VoiceSession::start(transport, devices_released_once(), "scholar")
            .await
            .unwrap();

        assert!(session.close().await.is_err());
    }

    #[tokio::test]
    async fn test_drop_releases_devices() {
        let session = VoiceSession::start(open_transport(), devices_released_once(), "scholar")
            .await
            .unwrap();
        drop(session);
    }

    #[tokio::test]
    async fn test_audio_round_trip_and_rate_check() {
        let mut transport = open_transport();
        transport.expect_send_audio_chunk().times(1).returning(|_| Ok(()));
        transport.expect_next_audio_chunk().times(1).returning(|| {
            Ok(Some(AudioChunk {
                data: vec![0, 1],
                sample_rate: OUTPUT_SAMPLE_RATE,
            }))
        });
        transport.expect_close().returning(|| Ok(()));

        let mut session = VoiceSession::start(transport, devices_released_once(), "scholar")
            .await
            .unwrap();

        let wrong_rate = AudioChunk {
            data: vec![0; 4],
            sample_rate: 44_100,
        };
        assert!(matches!(
            session.send_audio_chunk(wrong_rate).await,
            Err(AppError::InvalidInput(_))
        ));

        session
            .send_audio_chunk(AudioChunk {
                data: vec![0; 4],
                sample_rate: INPUT_SAMPLE_RATE,
            })
            .await
            .unwrap();

        let incoming = session.next_audio_chunk().await.unwrap().unwrap();
        assert_eq!(incoming.sample_rate, OUTPUT_SAMPLE_RATE);

        session.close().await.unwrap();
    }
}
